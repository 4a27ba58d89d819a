mod services;

pub use services::{ChatSource, ChatStore, SentimentClassifier, SurrealChatStore};

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use common::{
    error::AppError,
    storage::types::{chat_record::ChatRecord, video_info::VideoInfo},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{types::ChatMessage, window::PassWindow};

/// Counters describing one finished ingestion pass. Surfaced through logs
/// and tests; the HTTP caller only sees success or failure.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub fetched: usize,
    pub retained: usize,
    pub persisted: usize,
    pub classify_failures: usize,
    pub persist_failures: usize,
}

#[allow(clippy::module_name_repetitions)]
pub struct IngestionPipeline {
    source: Arc<dyn ChatSource>,
    classifier: Arc<dyn SentimentClassifier>,
    store: Arc<dyn ChatStore>,
}

impl IngestionPipeline {
    pub fn new(
        source: Arc<dyn ChatSource>,
        classifier: Arc<dyn SentimentClassifier>,
        store: Arc<dyn ChatStore>,
    ) -> Self {
        Self {
            source,
            classifier,
            store,
        }
    }

    /// Run one ingestion pass: fetch the chat history, keep the messages
    /// inside the window, classify them one by one and upsert the records.
    ///
    /// A fetch error aborts the pass; classification and persistence errors
    /// are confined to the message they hit.
    #[tracing::instrument(
        skip_all,
        fields(
            pass_id = %Uuid::new_v4(),
            source_id = %video.source_id,
            chat_id = %video.chat_id
        )
    )]
    pub async fn execute(
        &self,
        video: &VideoInfo,
        window: PassWindow,
    ) -> Result<PassSummary, AppError> {
        let pass_started = Instant::now();
        info!(
            window_start = %window.start,
            window_end = %window.end,
            "starting chat ingestion pass"
        );

        let stage_start = Instant::now();
        let messages = self.source.fetch_messages(video).await.map_err(|err| {
            error!(error = %err, "failed to fetch chat history; aborting pass");
            err
        })?;
        let fetch_duration = stage_start.elapsed();

        let mut summary = PassSummary {
            fetched: messages.len(),
            ..PassSummary::default()
        };

        let retained: Vec<(ChatMessage, DateTime<Utc>)> = messages
            .into_iter()
            .filter_map(|message| {
                message
                    .published_at_utc()
                    .map(|published_at| (message, published_at))
            })
            .filter(|(_, published_at)| window.contains(*published_at))
            .collect();
        summary.retained = retained.len();

        let stage_start = Instant::now();
        for (message, published_at) in retained {
            let is_negative = match self.classifier.is_negative(&message.message).await {
                Ok(is_negative) => is_negative,
                Err(err) => {
                    warn!(
                        author = %message.author_channel_id,
                        error = %err,
                        "sentiment classification failed; skipping message"
                    );
                    summary.classify_failures = summary.classify_failures.saturating_add(1);
                    continue;
                }
            };

            let record = ChatRecord::new(
                message.message,
                is_negative,
                message.source_id,
                published_at,
            );
            match self.store.upsert(record).await {
                Ok(()) => summary.persisted = summary.persisted.saturating_add(1),
                Err(err) => {
                    warn!(error = %err, "failed to persist chat record; continuing pass");
                    summary.persist_failures = summary.persist_failures.saturating_add(1);
                }
            }
        }
        let process_duration = stage_start.elapsed();

        info!(
            total_ms = Self::duration_millis(pass_started.elapsed()),
            fetch_ms = Self::duration_millis(fetch_duration),
            process_ms = Self::duration_millis(process_duration),
            fetched = summary.fetched,
            retained = summary.retained,
            persisted = summary.persisted,
            classify_failures = summary.classify_failures,
            persist_failures = summary.persist_failures,
            "chat ingestion pass finished"
        );

        Ok(summary)
    }

    fn duration_millis(duration: Duration) -> u64 {
        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }
}
