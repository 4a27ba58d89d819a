use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use common::storage::types::video_info::VideoInfo;
use ingestion_pipeline::{resolve_span, PassWindow};
use serde_json::json;
use tokio::time::{timeout, Duration};
use tracing::{error, info};

use crate::{api_state::ApiState, error::ApiError};

/// Trigger one ingestion pass over the trailing window.
///
/// The scheduler only learns success or failure from the response; the
/// per-message outcomes of the pass are visible in the logs.
pub async fn watch(
    State(state): State<ApiState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let requested_span = first_query_value(query.as_deref(), "span");
    let span = resolve_span(requested_span.as_deref());

    let Some(video) = VideoInfo::get_live(&state.db).await? else {
        info!("no live broadcast tracked; nothing to ingest");
        return Ok((StatusCode::OK, Json(json!({"status": "idle"}))));
    };

    let window = PassWindow::trailing(Utc::now(), span.minutes);
    let pass_timeout = Duration::from_secs(state.config.pass_timeout_secs);

    let summary = match timeout(pass_timeout, state.pipeline.execute(&video, window)).await {
        Ok(result) => result?,
        Err(_) => {
            error!(
                timeout_secs = state.config.pass_timeout_secs,
                source_id = %video.source_id,
                "ingestion pass timed out"
            );
            return Err(ApiError::InternalError(
                "Ingestion pass timed out".to_string(),
            ));
        }
    };

    info!(
        span_minutes = span.minutes,
        used_default_span = span.used_default,
        persisted = summary.persisted,
        "ingestion pass completed"
    );

    Ok((StatusCode::OK, Json(json!({"status": "success"}))))
}

/// Pulls the first value for `key` out of the raw query string. When the key
/// repeats, the first pair wins; a query that does not mention the key at all
/// yields `None`.
fn first_query_value(query: Option<&str>, key: &str) -> Option<String> {
    query.and_then(|raw| {
        url::form_urlencoded::parse(raw.as_bytes())
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    })
}
