use std::sync::Arc;

use async_trait::async_trait;
use common::{
    error::AppError,
    storage::{
        db::SurrealDbClient,
        types::{chat_record::ChatRecord, video_info::VideoInfo},
    },
};

use crate::types::ChatMessage;

/// Produces the raw chat history for a tracked broadcast. Any error here is
/// pass-fatal.
#[async_trait]
pub trait ChatSource: Send + Sync {
    async fn fetch_messages(&self, video: &VideoInfo) -> Result<Vec<ChatMessage>, AppError>;
}

/// Judges a single message. An error skips that message only.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn is_negative(&self, message: &str) -> Result<bool, AppError>;
}

/// Writes one record. An error affects that record only.
#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn upsert(&self, record: ChatRecord) -> Result<(), AppError>;
}

pub struct SurrealChatStore {
    db: Arc<SurrealDbClient>,
}

impl SurrealChatStore {
    pub fn new(db: Arc<SurrealDbClient>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChatStore for SurrealChatStore {
    async fn upsert(&self, record: ChatRecord) -> Result<(), AppError> {
        record.upsert(&self.db).await
    }
}
