use chrono::{DateTime, Utc};

/// One chat message as fetched from the platform, before classification or
/// persistence. Lives only within a single ingestion pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub author_channel_id: String,
    pub message: String,
    /// Publish time as unix seconds.
    pub published_at: i64,
    pub source_id: String,
}

impl ChatMessage {
    pub fn published_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.published_at, 0)
    }
}
