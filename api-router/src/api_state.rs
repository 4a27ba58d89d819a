use std::sync::Arc;

use common::{storage::db::SurrealDbClient, utils::config::AppConfig};
use ingestion_pipeline::IngestionPipeline;

#[derive(Clone)]
pub struct ApiState {
    pub db: Arc<SurrealDbClient>,
    pub config: AppConfig,
    pub pipeline: Arc<IngestionPipeline>,
}

impl ApiState {
    pub async fn new(
        config: &AppConfig,
        pipeline: Arc<IngestionPipeline>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let surreal_db_client = Arc::new(
            SurrealDbClient::new(
                &config.surrealdb_address,
                &config.surrealdb_username,
                &config.surrealdb_password,
                &config.surrealdb_namespace,
                &config.surrealdb_database,
            )
            .await?,
        );

        surreal_db_client.ensure_initialized().await?;

        let app_state = Self {
            db: surreal_db_client,
            config: config.clone(),
            pipeline,
        };

        Ok(app_state)
    }
}
