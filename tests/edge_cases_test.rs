/// Edge case tests for unusual or malformed exports
mod common;

use std::fs;
use std::io::Cursor;

use common::{ExportBuilder, MessageBuilder, read_lines};
use serde_json::json;
use tg2md::ExportParser;
use tg2md::convert_export;
use tg2md::logging::{ColorChoice, ERROR_LOG_FILE, Logger};

fn quiet_logger() -> Logger {
    Logger::new(ColorChoice::Never, true)
}

#[test]
fn test_empty_messages_array() {
    let (temp, input) = ExportBuilder::new("Пустой чат").build();

    let summary = convert_export(&input, temp.path(), &mut quiet_logger()).unwrap();

    assert_eq!(summary.total, 0);
    assert_eq!(summary.files_created, 0);
    let dir = temp.path().join("Пустой_чат");
    assert!(dir.join(ERROR_LOG_FILE).exists());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);
}

#[test]
fn test_malformed_elements_do_not_stop_conversion() {
    let (temp, input) = ExportBuilder::new("Group")
        .message(MessageBuilder::text(1, "2024-05-01T08:00:00", "Иван", "до"))
        .raw_message(json!({"id": 2, "text": 42}))
        .raw_message(json!("not an object"))
        .raw_message(json!({"id": 4, "text": [{"type": "bold", "text": "x"}, 7]}))
        .message(MessageBuilder::text(5, "2024-05-01T08:05:00", "Иван", "после"))
        .build();

    let summary = convert_export(&input, temp.path(), &mut quiet_logger()).unwrap();

    assert_eq!(summary.total, 5);
    assert_eq!(summary.processed, 2);
    assert_eq!(summary.skipped, 3);

    let lines = read_lines(&temp.path().join("Group").join("Group_may_2024.md"));
    assert_eq!(lines[0], "[2024-05-01 08:00] Иван: до");
    assert_eq!(lines[2], "[2024-05-01 08:05] Иван: после");

    let log = read_lines(&temp.path().join("Group").join(ERROR_LOG_FILE));
    assert_eq!(log.len(), 3);
    assert!(log[0].starts_with("Message ID 2: decode message"));
    assert!(log[1].starts_with("Message ID 0: decode message"));
    assert!(log[2].starts_with("Message ID 4: decode message"));
}

#[test]
fn test_truncated_export_keeps_messages_before_error() {
    let temp = tempfile::TempDir::new().unwrap();
    let input = temp.path().join("result.json");
    fs::write(
        &input,
        r#"{"name": "Group", "type": "private_group", "messages": [
            {"id": 1, "type": "message", "date": "2024-05-01T08:00:00", "from": "Иван", "text": "раз"},
            {"id": 2, "type": "message", "date": "2024-05-01T08:01:00", "#,
    )
    .unwrap();

    let summary = convert_export(&input, temp.path(), &mut quiet_logger()).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);
    let log = read_lines(&temp.path().join("Group").join(ERROR_LOG_FILE));
    assert!(log[0].starts_with("Message ID 0: read messages"));
}

#[test]
fn test_chat_name_with_reserved_characters() {
    let (temp, input) = ExportBuilder::new("  Чат: <проекты> / 2024?  ")
        .message(MessageBuilder::text(1, "2024-12-31T23:59:00", "Иван", "С наступающим 🎄"))
        .build();

    let summary = convert_export(&input, temp.path(), &mut quiet_logger()).unwrap();

    let dir = temp.path().join("Чат_проекты_2024");
    assert_eq!(summary.output_dir, dir);
    let lines = read_lines(&dir.join("Чат_проекты_2024_december_2024.md"));
    assert_eq!(lines[0], "[2024-12-31 23:59] Иван: С наступающим 🎄");
}

#[test]
fn test_name_of_only_reserved_characters_falls_back() {
    let (temp, input) = ExportBuilder::new("///")
        .message(MessageBuilder::text(1, "2024-12-31T23:59:00", "Иван", "текст"))
        .build();

    let summary = convert_export(&input, temp.path(), &mut quiet_logger()).unwrap();

    assert_eq!(summary.output_dir, temp.path().join("chat"));
    assert!(temp.path().join("chat").join("chat_december_2024.md").exists());
}

#[test]
fn test_invisible_characters_removed_from_body() {
    let (temp, input) = ExportBuilder::new("Group")
        .message(MessageBuilder::text(1, "2024-05-01T08:00:00", "Иван", "при\u{200B}вет\u{FEFF}"))
        .message(MessageBuilder::text(2, "2024-05-01T08:01:00", "Иван", "\u{200B}\u{2060}"))
        .build();

    let summary = convert_export(&input, temp.path(), &mut quiet_logger()).unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.skipped, 1);
    let lines = read_lines(&temp.path().join("Group").join("Group_may_2024.md"));
    assert_eq!(lines[0], "[2024-05-01 08:00] Иван: привет");
}

#[test]
fn test_missing_author_uses_placeholder() {
    let (temp, input) = ExportBuilder::new("Group")
        .message(MessageBuilder::new(1, "2024-05-01T08:00:00").with_text(json!("анонимно")))
        .build();

    convert_export(&input, temp.path(), &mut quiet_logger()).unwrap();

    let lines = read_lines(&temp.path().join("Group").join("Group_may_2024.md"));
    assert_eq!(lines[0], "[2024-05-01 08:00] Unknown: анонимно");
}

#[test]
fn test_out_of_order_month_appends() {
    let (temp, input) = ExportBuilder::new("Group")
        .message(MessageBuilder::text(1, "2024-01-10T08:00:00", "Иван", "январь"))
        .message(MessageBuilder::text(2, "2024-02-10T08:00:00", "Иван", "февраль"))
        .message(MessageBuilder::text(3, "2024-01-20T08:00:00", "Иван", "снова январь"))
        .build();

    let summary = convert_export(&input, temp.path(), &mut quiet_logger()).unwrap();

    assert_eq!(summary.files_created, 2);
    assert_eq!(
        summary.months,
        vec![("january_2024".to_string(), 2), ("february_2024".to_string(), 1)]
    );
    let lines = read_lines(&temp.path().join("Group").join("Group_january_2024.md"));
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[2], "[2024-01-20 08:00] Иван: снова январь");
}

#[test]
fn test_offset_dates_keep_local_calendar_fields() {
    let (temp, input) = ExportBuilder::new("Group")
        .message(MessageBuilder::text(1, "2024-03-31T23:30:00+03:00", "Иван", "поздно"))
        .build();

    convert_export(&input, temp.path(), &mut quiet_logger()).unwrap();

    let lines = read_lines(&temp.path().join("Group").join("Group_march_2024.md"));
    assert_eq!(lines[0], "[2024-03-31 23:30] Иван: поздно");
}

#[test]
fn test_metadata_after_messages_key() {
    let json = r#"{"messages": [{"id": 1}], "type": "saved_messages", "name": "Избранное"}"#;
    let mut parser = ExportParser::new(Cursor::new(json.as_bytes().to_vec()));

    let chat = parser.read_chat_metadata().unwrap();
    assert_eq!(chat.name, "Избранное");
    assert_eq!(chat.chat_type.as_deref(), Some("saved_messages"));

    let ids: Vec<i64> = parser.stream_messages().map(|m| m.unwrap().id).collect();
    assert_eq!(ids, vec![1]);
}
