//! tg2md - Convert Telegram chat exports to monthly Markdown files
//!
//! This library turns a Telegram Desktop JSON export (`result.json`) into one Markdown file per
//! calendar month. It supports:
//!
//! - Streaming the export without loading the message list into memory
//! - Rendering formatted text (bold, italic, code, links) as Markdown
//! - Reply previews, forwarded-message and service-event annotations
//! - File-system safe naming of the output directory and files
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tg2md::logging::{ColorChoice, Logger};
//! use tg2md::convert_export;
//!
//! let mut logger = Logger::new(ColorChoice::Auto, false);
//! let summary = convert_export(Path::new("result.json"), Path::new("."), &mut logger)?;
//! println!("Wrote {} files", summary.files_created);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod converter;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod utils;
pub mod writer;

// Re-export commonly used types
pub use converter::{ConvertError, Converter, FormattedLine};
pub use models::{ChatMetadata, Message, TextField, TextSpan};
pub use parsers::{DecodeError, ExportParser, MetadataError};
pub use pipeline::{ConversionSummary, ConvertConfig, convert_export};
pub use writer::MonthlyWriter;
