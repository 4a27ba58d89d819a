use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use common::storage::types::video_info::VideoInfo;
use serde_json::json;

use crate::api_state::ApiState;

/// Readiness check: returns 200 when the database answers, else 503. Also
/// reports whether a broadcast is currently tracked; an idle registry does
/// not make the service unready.
pub async fn ready(State(state): State<ApiState>) -> impl IntoResponse {
    if let Err(e) = state.db.client.query("RETURN true").await {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "error",
                "checks": { "db": "fail" },
                "reason": e.to_string()
            })),
        );
    }

    let tracking = match VideoInfo::get_live(&state.db).await {
        Ok(Some(_)) => "live",
        Ok(None) => "idle",
        Err(_) => "unknown",
    };

    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "checks": { "db": "ok" },
            "tracking": tracking
        })),
    )
}
