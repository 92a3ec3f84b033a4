/// Chat-level fields read from the top of the export, before any message is streamed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMetadata {
    pub name: String,
    /// `type` in the export, e.g. `private_group`
    pub chat_type: Option<String>,
}
