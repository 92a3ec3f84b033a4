//! End-to-end conversion of one chat export
//!
//! # Error Handling Strategy
//!
//! - **Fatal errors** abort the run and are returned as `anyhow` errors with context: a missing
//!   input file, an export without a chat name, an output directory or error log that cannot be
//!   created, and a monthly file that cannot be flushed at the end.
//!
//! - **Per-message errors** are counted and recorded in the error log, and the run continues:
//!   decode failures, bad dates, empty bodies and failed writes. Decode failures that happen
//!   before a message id is known are logged under id 0.
//!
//! A summary with total, processed and skipped counts is always reported on success.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::converter::Converter;
use crate::logging::{ColorChoice, ERROR_LOG_FILE, Logger};
use crate::models::{ChatMetadata, Message};
use crate::parsers::ExportParser;
use crate::utils::strip_ansi_codes;
use crate::writer::MonthlyWriter;

/// Settings for one conversion run
///
/// Decouples the conversion from how the arguments were parsed.
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub input: PathBuf,
    /// Directory the chat's own output directory is created in
    pub output_root: PathBuf,
    pub quiet: bool,
    pub color: ColorChoice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub chat: ChatMetadata,
    pub output_dir: PathBuf,
    /// Every item of the message stream, including ones that failed to decode
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    /// Month keys with message counts, in first-written order
    pub months: Vec<(String, usize)>,
    pub files_created: usize,
}

/// Run a conversion with a console logger built from the config
pub fn run(config: &ConvertConfig) -> Result<ConversionSummary> {
    let mut logger = Logger::new(config.color, config.quiet);
    convert_export(&config.input, &config.output_root, &mut logger)
}

/// Convert the export at `input` into monthly Markdown files under `output_root`
pub fn convert_export(
    input: &Path,
    output_root: &Path,
    logger: &mut Logger,
) -> Result<ConversionSummary> {
    if !input.exists() {
        bail!("file not found: {}", input.display());
    }

    let mut parser = ExportParser::open(input)
        .with_context(|| format!("Failed to open export: {}", input.display()))?;
    let chat = parser.read_chat_metadata().context("Failed to parse chat info")?;

    let mut writer = MonthlyWriter::new(output_root, &chat.name);
    let output_dir = writer.output_dir().to_path_buf();
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;
    logger.attach_error_log(&output_dir.join(ERROR_LOG_FILE))?;

    logger.info(format!("Loading: {}", input.display()));
    logger.info(format!("Group: {}", strip_ansi_codes(&chat.name)));

    let mut converter = Converter::new();
    let mut total = 0;
    let mut processed = 0;
    let mut skipped = 0;

    for item in parser.stream_messages() {
        total += 1;

        let message = match item {
            Ok(message) => message,
            Err(e) => {
                logger.log_skip(e.message_id().unwrap_or(0), &e);
                skipped += 1;
                continue;
            }
        };

        match write_message(&message, &mut converter, &mut writer) {
            Ok(()) => processed += 1,
            Err(e) => {
                logger.log_skip(message.id, e);
                skipped += 1;
            }
        }
    }

    writer.close().context("Failed to finish monthly file")?;
    logger.close()?;

    let months: Vec<(String, usize)> =
        writer.months().map(|(key, count)| (key.to_string(), count)).collect();

    logger.info(format!("Found {} messages", total));
    for (month, count) in &months {
        logger.info(format!("Processed {} ({} messages)", month, count));
    }
    logger.success(format!(
        "Done! Created {} files, processed {} messages, skipped {}",
        writer.file_count(),
        processed,
        skipped
    ));
    if skipped > 0 {
        logger.warning(format!(
            "Skipped messages are listed in {}",
            output_dir.join(ERROR_LOG_FILE).display()
        ));
    }

    Ok(ConversionSummary {
        chat,
        output_dir,
        total,
        processed,
        skipped,
        months,
        files_created: writer.file_count(),
    })
}

fn write_message(
    message: &Message,
    converter: &mut Converter,
    writer: &mut MonthlyWriter,
) -> Result<()> {
    let line = converter.convert_message(message)?;
    writer.write_message(&line.text, &line.timestamp)?;
    Ok(())
}
