//! Streaming parser for Telegram chat exports
//!
//! # Error Handling Strategy
//!
//! Chat exports can hold hundreds of thousands of messages, so a single bad record must not
//! break the whole conversion:
//!
//! - **Metadata failures are fatal**: an export without a chat `name` is rejected with
//!   [`MetadataError`], since there is nothing to name the output after.
//!
//! - **Per-message failures are inline**: a message element that does not match the schema is
//!   yielded as a [`DecodeError`] item, and the stream moves on to the next element. Elements are
//!   first read as generic JSON values, so a schema mismatch never desynchronizes the reader.
//!
//! - **Syntax errors end the stream**: malformed JSON cannot be resynchronized; the stream yields
//!   one [`DecodeError::Syntax`] item and stops.

pub mod deserializers;
pub mod export;

pub use export::{
    DecodeError, ExportParser, MessageResult, MessageStream, MetadataError, STREAM_BUFFER,
};
