//! Data models for Telegram chat exports.
//!
//! - [`ChatMetadata`] - chat name and type from the top of the export
//! - [`Message`] - one record of the `messages` array
//! - [`TextField`] / [`TextSpan`] - the polymorphic message body
//!
//! Message bodies use custom deserializers from the `parsers::deserializers` module because the
//! export mixes plain strings, entity objects and bare strings inside entity arrays.

pub mod chat;
pub mod message;

pub use chat::ChatMetadata;
pub use message::{Message, MessageKind, SpanKind, TextField, TextSpan};
