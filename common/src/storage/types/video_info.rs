use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

/// Lifecycle status the upstream tracker writes for an ongoing broadcast.
pub const LIVE_STATUS: &str = "live";

stored_object!(VideoInfo, "video_info", {
    source_id: String,
    status: String,
    chat_id: String
});

impl VideoInfo {
    pub fn new(source_id: String, status: String, chat_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: source_id.clone(),
            created_at: now,
            updated_at: now,
            source_id,
            status,
            chat_id,
        }
    }

    pub fn is_live(&self) -> bool {
        self.status == LIVE_STATUS
    }

    /// The broadcast the upstream tracker currently marks as live, if any.
    pub async fn get_live(db: &SurrealDbClient) -> Result<Option<Self>, AppError> {
        let mut result = db
            .query(format!(
                "SELECT * FROM {} WHERE status = $status LIMIT 1",
                Self::table_name()
            ))
            .bind(("status", LIVE_STATUS))
            .await?;
        let video: Option<Self> = result.take(0)?;
        Ok(video)
    }
}
