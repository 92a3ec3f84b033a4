//! Month-split Markdown output
//!
//! Lines are appended to `<group>_<month>_<year>.md` inside the group's output directory. Only
//! one file is open at a time; when the month of the incoming line changes, the current file is
//! flushed and closed before the next one is opened.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, FixedOffset};
use thiserror::Error;

use crate::utils::sanitize_name;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Fallback file stem for chats whose name sanitizes to nothing
const UNNAMED_CHAT: &str = "chat";

#[derive(Debug, Error)]
pub enum WriterError {
    #[error("create file {}: {source}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write message: {0}")]
    Write(#[source] io::Error),
    #[error("flush file: {0}")]
    Flush(#[source] io::Error),
}

/// Bucket key for a timestamp, e.g. `january_2024`
///
/// Uses the timestamp's own calendar fields, without any time zone conversion.
pub fn month_key(timestamp: &DateTime<FixedOffset>) -> String {
    format!("{}_{}", MONTH_NAMES[timestamp.month0() as usize], timestamp.year())
}

/// Output directory name for a chat
pub fn group_dir_name(group_name: &str) -> String {
    let sanitized = sanitize_name(group_name);
    if sanitized.is_empty() { UNNAMED_CHAT.to_string() } else { sanitized }
}

struct MonthBucket {
    key: String,
    file: BufWriter<File>,
}

impl MonthBucket {
    fn finish(mut self) -> Result<(), WriterError> {
        self.file.flush().map_err(WriterError::Flush)
    }
}

pub struct MonthlyWriter {
    output_dir: PathBuf,
    file_stem: String,
    current: Option<MonthBucket>,
    stats: HashMap<String, usize>,
    /// Month keys in the order they were first written
    months: Vec<String>,
}

impl MonthlyWriter {
    /// Create a writer for `group_name` under `base_dir`
    ///
    /// Files go to `base_dir/<sanitized group name>/`. The directory is not created here; it
    /// must exist before the first [`write_message`](Self::write_message).
    pub fn new(base_dir: &Path, group_name: &str) -> Self {
        let file_stem = group_dir_name(group_name);
        Self {
            output_dir: base_dir.join(&file_stem),
            file_stem,
            current: None,
            stats: HashMap::new(),
            months: Vec::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path of the Markdown file for a month key
    pub fn month_file(&self, key: &str) -> PathBuf {
        self.output_dir.join(format!("{}_{}.md", self.file_stem, key))
    }

    /// Append a line, followed by one blank line, to the file for the timestamp's month
    ///
    /// The first time a month is seen in this writer its file is created or truncated. A month
    /// that comes back after another one (an out-of-order export) is reopened for appending.
    pub fn write_message(
        &mut self,
        line: &str,
        timestamp: &DateTime<FixedOffset>,
    ) -> Result<(), WriterError> {
        let key = month_key(timestamp);

        let mut bucket = match self.current.take() {
            Some(bucket) if bucket.key == key => bucket,
            previous => {
                if let Some(previous) = previous {
                    previous.finish()?;
                }
                self.open_bucket(key)?
            }
        };

        let written = bucket
            .file
            .write_all(line.as_bytes())
            .and_then(|()| bucket.file.write_all(b"\n\n"));
        if written.is_ok()
            && let Some(count) = self.stats.get_mut(&bucket.key)
        {
            *count += 1;
        }

        self.current = Some(bucket);
        written.map_err(WriterError::Write)
    }

    /// Flush and close the open file, if any
    pub fn close(&mut self) -> Result<(), WriterError> {
        match self.current.take() {
            Some(bucket) => bucket.finish(),
            None => Ok(()),
        }
    }

    /// Messages written per month key
    pub fn stats(&self) -> &HashMap<String, usize> {
        &self.stats
    }

    /// Month keys with their counts, in first-written order
    pub fn months(&self) -> impl Iterator<Item = (&str, usize)> {
        self.months
            .iter()
            .map(|key| (key.as_str(), self.stats.get(key).copied().unwrap_or_default()))
    }

    /// Number of distinct monthly files opened
    pub fn file_count(&self) -> usize {
        self.months.len()
    }

    fn open_bucket(&mut self, key: String) -> Result<MonthBucket, WriterError> {
        let path = self.month_file(&key);
        let revisit = self.stats.contains_key(&key);

        let opened = if revisit {
            OpenOptions::new().append(true).create(true).open(&path)
        } else {
            File::create(&path)
        };
        let file = opened.map_err(|source| WriterError::Create { path, source })?;

        if !revisit {
            self.stats.insert(key.clone(), 0);
            self.months.push(key.clone());
        }

        Ok(MonthBucket { key, file: BufWriter::new(file) })
    }
}
