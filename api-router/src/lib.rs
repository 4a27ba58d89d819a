use api_state::ApiState;
use axum::{extract::FromRef, routing::get, Router};
use routes::{liveness::live, readiness::ready, watch::watch};

pub mod api_state;
pub mod error;
mod routes;

/// Router for API functionality, version 1
pub fn api_routes_v1<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    ApiState: FromRef<S>,
{
    // Health endpoints for k8s/systemd plus the scheduler-facing trigger.
    // All callers are trusted infrastructure, so nothing here is authenticated.
    Router::new()
        .route("/ready", get(ready))
        .route("/live", get(live))
        .route("/watch", get(watch))
}
