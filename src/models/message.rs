use serde::Deserialize;

/// Kind of a message record (`type` in the export)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    Message,
    Service,
    #[serde(other)]
    Other,
}

/// Formatting kind of a text span (`type` of a text entity)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    #[default]
    Plain,
    Bold,
    Italic,
    Code,
    Pre,
    Link,
    TextLink,
    Mention,
    Hashtag,
    Email,
    Phone,
    /// Any kind without dedicated rendering (underline, spoiler, custom_emoji, ...)
    #[serde(other)]
    Other,
}

/// One formatted fragment of a message body
///
/// In the export an entity is either an object or a bare string; bare strings decode to a
/// [`SpanKind::Plain`] span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextSpan {
    pub kind: SpanKind,
    pub text: String,
    pub href: Option<String>,
}

impl TextSpan {
    pub fn new(kind: SpanKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into(), href: None }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(SpanKind::Plain, text)
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// The polymorphic `text` field: a plain string or an ordered list of spans
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextField {
    Plain(String),
    Spans(Vec<TextSpan>),
}

impl TextField {
    /// Plain string content, empty for the span form
    pub fn plain(&self) -> &str {
        match self {
            TextField::Plain(text) => text,
            TextField::Spans(_) => "",
        }
    }

    /// Span content, empty for the plain form
    pub fn spans(&self) -> &[TextSpan] {
        match self {
            TextField::Plain(_) => &[],
            TextField::Spans(spans) => spans,
        }
    }
}

impl Default for TextField {
    fn default() -> Self {
        TextField::Plain(String::new())
    }
}

/// A single record from the `messages` array
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_non_empty")]
    pub from: Option<String>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_non_empty")]
    pub forwarded_from: Option<String>,
    #[serde(default, rename = "reply_to_message_id")]
    pub reply_to_id: Option<i64>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_non_empty")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_non_empty")]
    pub actor: Option<String>,
    #[serde(default)]
    pub text: TextField,
    /// Legacy alternate entity list, used when `text` is empty
    #[serde(default)]
    pub text_entities: Vec<TextSpan>,
}

impl Message {
    /// Structural chat events render as annotations rather than authored lines
    pub fn is_service(&self) -> bool {
        self.kind == MessageKind::Service || self.action.is_some()
    }
}
