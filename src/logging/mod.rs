//! Console and error-file logging
//!
//! Progress goes to the console as leveled, optionally colored lines (`[INFO]`, `[OK]`,
//! `[WARN]`, `[ERROR]`). Every skipped message is additionally recorded in an `errors.log` file
//! next to the generated Markdown, one `Message ID <id>: <reason>` line per message.

use std::env;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use crossterm::style::{Color, Stylize, style};
use thiserror::Error;

/// File name of the per-chat skip log
pub const ERROR_LOG_FILE: &str = "errors.log";

#[derive(Debug, Error)]
pub enum LogError {
    #[error("create error log {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("flush error log: {0}")]
    Flush(#[source] io::Error),
}

/// When to color console output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal() && env::var_os("NO_COLOR").is_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "[INFO]",
            Level::Success => "[OK]",
            Level::Warning => "[WARN]",
            Level::Error => "[ERROR]",
        }
    }

    fn color(self) -> Color {
        match self {
            Level::Info => Color::Blue,
            Level::Success => Color::Green,
            Level::Warning => Color::Yellow,
            Level::Error => Color::Red,
        }
    }
}

/// Format a console line, with ANSI colors when `color` is set
pub fn render_line(level: Level, message: &str, color: bool) -> String {
    let line = format!("{} {}", level.tag(), message);
    if color { style(line).with(level.color()).to_string() } else { line }
}

pub struct Logger {
    color: bool,
    quiet: bool,
    error_log: Option<BufWriter<File>>,
}

impl Logger {
    pub fn new(color: ColorChoice, quiet: bool) -> Self {
        Self { color: color.enabled(), quiet, error_log: None }
    }

    /// Start recording skipped messages to `path`, truncating any previous log
    pub fn attach_error_log(&mut self, path: &Path) -> Result<(), LogError> {
        let file = File::create(path)
            .map_err(|source| LogError::Create { path: path.to_path_buf(), source })?;
        self.error_log = Some(BufWriter::new(file));
        Ok(())
    }

    pub fn info(&self, message: impl Display) {
        if !self.quiet {
            println!("{}", render_line(Level::Info, &message.to_string(), self.color));
        }
    }

    pub fn success(&self, message: impl Display) {
        if !self.quiet {
            println!("{}", render_line(Level::Success, &message.to_string(), self.color));
        }
    }

    pub fn warning(&self, message: impl Display) {
        eprintln!("{}", render_line(Level::Warning, &message.to_string(), self.color));
    }

    pub fn error(&self, message: impl Display) {
        eprintln!("{}", render_line(Level::Error, &message.to_string(), self.color));
    }

    /// Record a skipped message in the error log
    ///
    /// `id` is 0 when the message failed before its id could be read.
    pub fn log_skip(&mut self, id: i64, reason: impl Display) {
        let Some(log) = self.error_log.as_mut() else {
            return;
        };

        if let Err(e) = writeln!(log, "Message ID {}: {}", id, reason) {
            // Stop logging to a file that cannot be written instead of failing every message
            self.error_log = None;
            self.warning(format!("Failed to write error log: {}", e));
        }
    }

    /// Flush and close the error log
    pub fn close(&mut self) -> Result<(), LogError> {
        match self.error_log.take() {
            Some(mut log) => log.flush().map_err(LogError::Flush),
            None => Ok(()),
        }
    }
}
