//! Terminal output sanitization
//!
//! Chat names come from the export file and are echoed to the console by the logger. They are
//! passed through [`strip_ansi_codes`] first so an export cannot inject escape sequences.

/// Strips ANSI CSI escape sequences and stray control characters
///
/// # Examples
///
/// ```
/// use tg2md::utils::strip_ansi_codes;
///
/// assert_eq!(strip_ansi_codes("\x1b[31mЧат\x1b[0m"), "Чат");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // Skip parameters up to the final letter of the sequence
            for next_ch in chars.by_ref() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && ch != '\t' && ch != '\n' {
            continue;
        }

        result.push(ch);
    }

    result
}
