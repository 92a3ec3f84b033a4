use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded};
use serde::de::{self, DeserializeSeed, Deserializer as _, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde_json::Value;
use thiserror::Error;

use crate::models::{ChatMetadata, Message};

/// Number of decoded messages the reader thread may run ahead of the consumer
pub const STREAM_BUFFER: usize = 100;

/// Top-level key holding the message array
const MESSAGES_KEY: &str = "messages";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("seek export: {0}")]
    Seek(#[source] io::Error),
    #[error("read chat info: {0}")]
    Read(#[source] serde_json::Error),
    #[error("chat name not found in JSON")]
    MissingName,
    #[error("export source is unavailable")]
    SourceUnavailable,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    /// One array element did not match the message schema; the stream continues
    #[error("decode message: {source}")]
    Message {
        id: Option<i64>,
        #[source]
        source: serde_json::Error,
    },
    /// Malformed JSON inside the export; the stream ends after this item
    #[error("read messages: {0}")]
    Syntax(#[source] serde_json::Error),
    #[error("seek export: {0}")]
    Seek(#[source] io::Error),
    #[error("export source is unavailable")]
    SourceUnavailable,
}

impl DecodeError {
    /// Id of the offending message, when the element got far enough to expose one
    pub fn message_id(&self) -> Option<i64> {
        match self {
            DecodeError::Message { id, .. } => *id,
            _ => None,
        }
    }
}

pub type MessageResult = Result<Message, DecodeError>;

/// Streaming reader over a single chat export
///
/// The whole document is never materialized: chat metadata is picked from the top-level keys
/// with every other value skipped, and messages are decoded one array element at a time.
/// Each call re-reads the source from offset 0.
pub struct ExportParser<R> {
    // Moved into the reader thread while a stream is alive
    source: Option<R>,
}

impl ExportParser<File> {
    /// Open an export file for parsing
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R> ExportParser<R>
where
    R: Read + Seek + Send + 'static,
{
    pub fn new(source: R) -> Self {
        Self { source: Some(source) }
    }

    /// Read the chat name and type from the top level of the export
    ///
    /// Stops as soon as both fields are known. Arrays and objects under other keys (notably
    /// `messages`) are skipped without being decoded.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::MissingName`] when the export has no non-empty `name`.
    pub fn read_chat_metadata(&mut self) -> Result<ChatMetadata, MetadataError> {
        let source = self.source.as_mut().ok_or(MetadataError::SourceUnavailable)?;
        source.seek(SeekFrom::Start(0)).map_err(MetadataError::Seek)?;

        let mut fields = MetadataFields::default();
        let mut de = serde_json::Deserializer::from_reader(BufReader::new(&mut *source));
        let outcome = (&mut de).deserialize_map(MetadataVisitor { fields: &mut fields });

        // An early return leaves the top-level object unfinished, so the outcome only matters
        // when the scan ran without finding both fields
        if !fields.is_complete() {
            outcome.map_err(MetadataError::Read)?;
        }

        let name = fields.name.ok_or(MetadataError::MissingName)?;
        Ok(ChatMetadata { name, chat_type: fields.chat_type })
    }

    /// Stream the `messages` array one element at a time
    ///
    /// Elements that fail to decode are yielded as [`DecodeError`] items and streaming goes on
    /// with the next element. Decoding runs on a reader thread that stays at most
    /// [`STREAM_BUFFER`] messages ahead. Dropping the stream before it is exhausted stops the
    /// reader and hands the source back to the parser.
    pub fn stream_messages(&mut self) -> MessageStream<'_, R> {
        let Some(source) = self.source.take() else {
            return MessageStream {
                receiver: None,
                producer: None,
                slot: &mut self.source,
                pending: Some(DecodeError::SourceUnavailable),
            };
        };

        let (tx, rx) = bounded(STREAM_BUFFER);
        let producer = thread::spawn(move || {
            let mut source = source;
            produce_messages(&mut source, &tx);
            source
        });

        MessageStream {
            receiver: Some(rx),
            producer: Some(producer),
            slot: &mut self.source,
            pending: None,
        }
    }
}

/// Lazy, single-pass sequence of decoded messages
pub struct MessageStream<'a, R> {
    receiver: Option<Receiver<MessageResult>>,
    producer: Option<JoinHandle<R>>,
    slot: &'a mut Option<R>,
    pending: Option<DecodeError>,
}

impl<R> Iterator for MessageStream<'_, R> {
    type Item = MessageResult;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.pending.take() {
            return Some(Err(err));
        }
        self.receiver.as_ref()?.recv().ok()
    }
}

impl<R> Drop for MessageStream<'_, R> {
    fn drop(&mut self) {
        // Disconnect first so a reader blocked on a full channel gives up
        self.receiver.take();
        if let Some(producer) = self.producer.take()
            && let Ok(source) = producer.join()
        {
            *self.slot = Some(source);
        }
    }
}

#[derive(Default)]
struct MetadataFields {
    name: Option<String>,
    chat_type: Option<String>,
}

impl MetadataFields {
    fn is_complete(&self) -> bool {
        self.name.is_some() && self.chat_type.is_some()
    }
}

struct MetadataVisitor<'a> {
    fields: &'a mut MetadataFields,
}

impl<'de> Visitor<'de> for MetadataVisitor<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a chat export object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "name" => {
                    let name = map.next_value::<Option<String>>()?;
                    self.fields.name = name.filter(|n| !n.is_empty());
                }
                "type" => {
                    let chat_type = map.next_value::<Option<String>>()?;
                    self.fields.chat_type = chat_type.filter(|t| !t.is_empty());
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }

            if self.fields.is_complete() {
                return Ok(());
            }
        }
        Ok(())
    }
}

struct StreamState<'a> {
    tx: &'a Sender<MessageResult>,
    /// Consumer dropped the stream
    closed: bool,
    /// The messages array was read to its end
    finished: bool,
}

fn produce_messages<R: Read + Seek>(source: &mut R, tx: &Sender<MessageResult>) {
    if let Err(e) = source.seek(SeekFrom::Start(0)) {
        let _ = tx.send(Err(DecodeError::Seek(e)));
        return;
    }

    let mut state = StreamState { tx, closed: false, finished: false };
    let mut de = serde_json::Deserializer::from_reader(BufReader::new(source));
    let outcome = (&mut de).deserialize_map(ExportVisitor { state: &mut state });

    if let Err(e) = outcome
        && !state.closed
        && !state.finished
    {
        let _ = tx.send(Err(DecodeError::Syntax(e)));
    }
}

struct ExportVisitor<'s, 'a> {
    state: &'s mut StreamState<'a>,
}

impl<'de> Visitor<'de> for ExportVisitor<'_, '_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a chat export object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<(), A::Error>
    where
        A: MapAccess<'de>,
    {
        let state = self.state;
        while let Some(key) = map.next_key::<String>()? {
            if key == MESSAGES_KEY {
                map.next_value_seed(MessagesSeed { state: &mut *state })?;
                state.finished = true;
                return Ok(());
            }
            map.next_value::<IgnoredAny>()?;
        }
        Ok(())
    }
}

struct MessagesSeed<'s, 'a> {
    state: &'s mut StreamState<'a>,
}

impl<'de> DeserializeSeed<'de> for MessagesSeed<'_, '_> {
    type Value = ();

    fn deserialize<D>(self, deserializer: D) -> Result<(), D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for MessagesSeed<'_, '_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a messages array")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<(), A::Error>
    where
        A: SeqAccess<'de>,
    {
        while let Some(raw) = seq.next_element::<Value>()? {
            if self.state.tx.send(decode_message(raw)).is_err() {
                self.state.closed = true;
                return Err(de::Error::custom("message stream closed"));
            }
        }
        Ok(())
    }
}

/// Decode one syntactically valid array element against the message schema
fn decode_message(raw: Value) -> MessageResult {
    let id = raw.get("id").and_then(Value::as_i64);
    serde_json::from_value(raw).map_err(|source| DecodeError::Message { id, source })
}
