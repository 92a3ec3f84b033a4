//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for Telegram export files inside a temp directory
pub struct ExportBuilder {
    temp_dir: TempDir,
    name: Option<String>,
    chat_type: String,
    messages: Vec<Value>,
}

impl ExportBuilder {
    pub fn new(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            name: Some(name.to_string()),
            chat_type: "private_group".to_string(),
            messages: Vec::new(),
        }
    }

    /// Export without a top-level `name` key
    pub fn unnamed() -> Self {
        let mut builder = Self::new("");
        builder.name = None;
        builder
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn message(mut self, message: MessageBuilder) -> Self {
        self.messages.push(message.to_json());
        self
    }

    /// Add an arbitrary JSON value to the messages array
    pub fn raw_message(mut self, value: Value) -> Self {
        self.messages.push(value);
        self
    }

    /// Write `result.json` and return the temp dir with the input path
    pub fn build(self) -> (TempDir, PathBuf) {
        let mut export = json!({
            "type": self.chat_type,
            "id": 4242,
            "messages": self.messages,
        });
        if let Some(name) = self.name {
            export["name"] = Value::String(name);
        }

        let input = self.temp_dir.path().join("result.json");
        let content = serde_json::to_string_pretty(&export).expect("Failed to encode export");
        fs::write(&input, content).expect("Failed to write result.json");
        (self.temp_dir, input)
    }
}

/// Builder for one element of the `messages` array
pub struct MessageBuilder {
    value: Value,
}

impl MessageBuilder {
    pub fn new(id: i64, date: &str) -> Self {
        Self { value: json!({ "id": id, "type": "message", "date": date }) }
    }

    pub fn text(id: i64, date: &str, from: &str, text: &str) -> Self {
        Self::new(id, date).from(from).with_text(json!(text))
    }

    pub fn service(id: i64, date: &str, actor: &str, action: &str) -> Self {
        let mut builder = Self::new(id, date);
        builder.value["type"] = json!("service");
        builder.value["actor"] = json!(actor);
        builder.value["action"] = json!(action);
        builder
    }

    pub fn from(mut self, from: &str) -> Self {
        self.value["from"] = json!(from);
        self
    }

    pub fn with_text(mut self, text: Value) -> Self {
        self.value["text"] = text;
        self
    }

    pub fn with_entities(mut self, entities: Value) -> Self {
        self.value["text_entities"] = entities;
        self
    }

    pub fn reply_to(mut self, id: i64) -> Self {
        self.value["reply_to_message_id"] = json!(id);
        self
    }

    pub fn forwarded_from(mut self, origin: &str) -> Self {
        self.value["forwarded_from"] = json!(origin);
        self
    }

    pub fn to_json(&self) -> Value {
        self.value.clone()
    }
}

/// Read a monthly file as lines
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
        .lines()
        .map(str::to_string)
        .collect()
}
