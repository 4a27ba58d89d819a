use std::sync::Arc;

use api_router::{api_routes_v1, api_state::ApiState};
use axum::Router;
use common::{storage::db::SurrealDbClient, utils::config::get_config};
use ingestion_pipeline::{
    IngestionPipeline, LlmSentimentClassifier, SurrealChatStore, YouTubeChatSource,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    // Get config
    let config = get_config()?;

    // Connection used by the ingestion pipeline's store
    let db = Arc::new(
        SurrealDbClient::new(
            &config.surrealdb_address,
            &config.surrealdb_username,
            &config.surrealdb_password,
            &config.surrealdb_namespace,
            &config.surrealdb_database,
        )
        .await?,
    );
    db.ensure_initialized().await?;

    let openai_client = Arc::new(async_openai::Client::with_config(
        async_openai::config::OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_base_url),
    ));

    let chat_source = Arc::new(YouTubeChatSource::new(
        reqwest::Client::new(),
        &config.youtube_api_key,
        &config.youtube_api_base,
    )?);
    let classifier = Arc::new(LlmSentimentClassifier::new(
        openai_client,
        &config.classifier_model,
    ));
    let store = Arc::new(SurrealChatStore::new(db));
    let pipeline = Arc::new(IngestionPipeline::new(chat_source, classifier, store));

    let api_state = ApiState::new(&config, pipeline).await?;

    // Create Axum router
    let app = Router::new()
        .nest("/api/v1", api_routes_v1())
        .with_state(api_state);

    info!("Starting server listening on 0.0.0.0:{}", config.http_port);
    let serve_address = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(serve_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use common::utils::config::AppConfig;
    use tower::ServiceExt;
    use uuid::Uuid;

    fn smoke_test_config(namespace: &str, database: &str) -> AppConfig {
        AppConfig {
            youtube_api_key: "test-key".into(),
            openai_api_key: "test-key".into(),
            surrealdb_address: "mem://".into(),
            surrealdb_username: "root".into(),
            surrealdb_password: "root".into(),
            surrealdb_namespace: namespace.into(),
            surrealdb_database: database.into(),
            http_port: 0,
            openai_base_url: "https://example.com".into(),
            classifier_model: "gpt-4o-mini".into(),
            youtube_api_base: "https://www.googleapis.com/youtube/v3".into(),
            pass_timeout_secs: 5,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn smoke_startup_with_in_memory_surrealdb() {
        let namespace = "test_ns";
        let database = format!("test_db_{}", Uuid::new_v4());
        let config = smoke_test_config(namespace, &database);

        let db = Arc::new(
            SurrealDbClient::memory(namespace, &database)
                .await
                .expect("failed to start in-memory surrealdb"),
        );
        db.ensure_initialized()
            .await
            .expect("failed to initialize database");

        let openai_client = Arc::new(async_openai::Client::with_config(
            async_openai::config::OpenAIConfig::new()
                .with_api_key(&config.openai_api_key)
                .with_api_base(&config.openai_base_url),
        ));

        let chat_source = Arc::new(
            YouTubeChatSource::new(
                reqwest::Client::new(),
                &config.youtube_api_key,
                &config.youtube_api_base,
            )
            .expect("failed to build chat source"),
        );
        let classifier = Arc::new(LlmSentimentClassifier::new(
            openai_client,
            &config.classifier_model,
        ));
        let store = Arc::new(SurrealChatStore::new(Arc::clone(&db)));
        let pipeline = Arc::new(IngestionPipeline::new(chat_source, classifier, store));

        let api_state = ApiState {
            db,
            config,
            pipeline,
        };

        let app = Router::new()
            .nest("/api/v1", api_routes_v1())
            .with_state(api_state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/live")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);

        let ready_response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/ready")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("ready response");
        assert_eq!(ready_response.status(), StatusCode::OK);
    }
}
