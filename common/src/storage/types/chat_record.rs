use crate::{error::AppError, storage::db::SurrealDbClient, stored_object};

stored_object!(ChatRecord, "chats", {
    message: String,
    is_negative: bool,
    source_id: String,
    #[serde(serialize_with = "serialize_datetime", deserialize_with = "deserialize_datetime")]
    published_at: DateTime<Utc>
});

impl ChatRecord {
    /// The record id is the message text itself, so writing two records with
    /// the same text collapses them into one row.
    pub fn new(
        message: String,
        is_negative: bool,
        source_id: String,
        published_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: message.clone(),
            created_at: now,
            updated_at: now,
            message,
            is_negative,
            source_id,
            published_at,
        }
    }

    /// Write the record, replacing any earlier record that shares its text.
    pub async fn upsert(self, db: &SurrealDbClient) -> Result<(), AppError> {
        db.upsert_item(self).await?;
        Ok(())
    }

    pub async fn get_by_source_id(
        source_id: &str,
        db: &SurrealDbClient,
    ) -> Result<Vec<Self>, AppError> {
        let mut result = db
            .query(format!(
                "SELECT * FROM {} WHERE source_id = $source_id ORDER BY published_at ASC",
                Self::table_name()
            ))
            .bind(("source_id", source_id.to_string()))
            .await?;
        let records: Vec<Self> = result.take(0)?;
        Ok(records)
    }
}
