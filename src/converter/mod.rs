//! Message to Markdown conversion
//!
//! A [`Converter`] is created per conversion run. It owns the reply cache, a map from message id
//! to the rendered body of every message converted so far, which is what reply previews are
//! built from. Messages must therefore be converted in stream order: a reply can only preview a
//! message that came before it.

pub mod timestamp;

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use thiserror::Error;

use crate::models::{Message, SpanKind, TextField, TextSpan};
use crate::utils::{is_only_whitespace, sanitize_text};
pub use timestamp::{DISPLAY_FORMAT, format_timestamp, parse_timestamp};

/// Longest reply preview, in characters, before it gets cut
pub const REPLY_PREVIEW_CHARS: usize = 50;

const UNKNOWN_AUTHOR: &str = "Unknown";
const ELLIPSIS: &str = "...";

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid date format {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("empty message")]
    EmptyMessage,
}

/// A rendered line and the instant it is filed under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedLine {
    pub text: String,
    pub timestamp: DateTime<FixedOffset>,
}

#[derive(Debug, Default)]
pub struct Converter {
    reply_cache: HashMap<i64, String>,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render formatted spans as Markdown, in order
    ///
    /// `text_link` spans render as their bare URL; the anchor text is dropped whenever an
    /// `href` is present.
    pub fn convert_spans(spans: &[TextSpan]) -> String {
        let mut out = String::new();

        for span in spans {
            let text = sanitize_text(&span.text);
            match span.kind {
                SpanKind::Bold => {
                    out.push_str("**");
                    out.push_str(&text);
                    out.push_str("**");
                }
                SpanKind::Italic => {
                    out.push('_');
                    out.push_str(&text);
                    out.push('_');
                }
                SpanKind::Code | SpanKind::Pre => {
                    out.push('`');
                    out.push_str(&text);
                    out.push('`');
                }
                SpanKind::TextLink => match span.href.as_deref().filter(|h| !h.is_empty()) {
                    Some(href) => out.push_str(href),
                    None => out.push_str(&text),
                },
                SpanKind::Plain
                | SpanKind::Link
                | SpanKind::Mention
                | SpanKind::Hashtag
                | SpanKind::Email
                | SpanKind::Phone
                | SpanKind::Other => out.push_str(&text),
            }
        }

        out
    }

    /// Convert one message into its display line
    ///
    /// # Errors
    ///
    /// - [`ConvertError::InvalidDate`] if the date matches neither accepted format
    /// - [`ConvertError::EmptyMessage`] if a non-service message has no visible text
    pub fn convert_message(&mut self, msg: &Message) -> Result<FormattedLine, ConvertError> {
        let timestamp = parse_timestamp(&msg.date)
            .map_err(|source| ConvertError::InvalidDate { value: msg.date.clone(), source })?;
        let stamp = format_timestamp(&timestamp);

        if msg.is_service() {
            let actor = msg.actor.as_deref().or(msg.from.as_deref()).unwrap_or(UNKNOWN_AUTHOR);
            let action = msg.action.as_deref().unwrap_or_default();
            let text = format!("[{}] [Служебное: {} {}]", stamp, actor, action);
            return Ok(FormattedLine { text, timestamp });
        }

        let body = resolve_body(msg);
        if is_only_whitespace(&body) {
            return Err(ConvertError::EmptyMessage);
        }

        // Cache the bare body, before any prefix is attached
        self.cache_message(msg.id, body.clone());

        let author = msg.from.as_deref().unwrap_or(UNKNOWN_AUTHOR);

        // A reply prefix wins over a forward prefix
        let prefix = match (msg.reply_to_id, msg.forwarded_from.as_deref()) {
            (Some(reply_id), _) => {
                let preview = self
                    .cached_message(reply_id)
                    .map(reply_preview)
                    .unwrap_or_else(|| ELLIPSIS.to_string());
                format!("[В ответ на: \"{}\"] ", preview)
            }
            (None, Some(origin)) => format!("[Переслано от: {}] ", origin),
            (None, None) => String::new(),
        };

        let text = format!("[{}] {}: {}{}", stamp, author, prefix, body);
        Ok(FormattedLine { text, timestamp })
    }

    /// Remember a rendered body for later reply lookups
    pub fn cache_message(&mut self, id: i64, text: impl Into<String>) {
        self.reply_cache.insert(id, text.into());
    }

    pub fn cached_message(&self, id: i64) -> Option<&str> {
        self.reply_cache.get(&id).map(String::as_str)
    }
}

/// First non-empty body source: plain text, then the span form, then legacy `text_entities`
fn resolve_body(msg: &Message) -> String {
    match &msg.text {
        TextField::Plain(text) if !text.is_empty() => sanitize_text(text),
        TextField::Spans(spans) if !spans.is_empty() => Converter::convert_spans(spans),
        _ if !msg.text_entities.is_empty() => Converter::convert_spans(&msg.text_entities),
        _ => String::new(),
    }
}

/// Single-line preview of a replied-to body, cut at [`REPLY_PREVIEW_CHARS`] characters
fn reply_preview(text: &str) -> String {
    let text = text.replace('\n', " ");
    if text.chars().count() <= REPLY_PREVIEW_CHARS {
        return text;
    }

    let mut preview: String = text.chars().take(REPLY_PREVIEW_CHARS - ELLIPSIS.len()).collect();
    preview.push_str(ELLIPSIS);
    preview
}
