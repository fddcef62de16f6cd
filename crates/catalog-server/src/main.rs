//! Catalog Server - Main entry point

use anyhow::Result;
use catalog_common::logging::{init_logging, LogConfig};
use std::sync::Arc;
use tracing::info;

use catalog_server::{
    api,
    config::Config,
    db::{self, PgCatalogStore, PgCategoryStore},
    features::FeatureState,
    ingest::IngestOrchestrator,
    middleware::auth::AdminToken,
    storage::{config::StorageConfig, Storage},
};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("catalog-server")
        .filter_directives("catalog_server=debug,tower_http=debug,sqlx=info")
        .build()
        .merge_env()?;

    init_logging(&log_config)?;

    info!("Starting Catalog Server");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let pool = db::create_pool(&config.database).await?;
    info!("Database connection pool established");

    db::run_migrations(&pool).await?;
    info!("Database migrations completed");

    let storage_config = StorageConfig::from_env()?;
    let storage = Storage::new(storage_config).await?;
    info!("Storage client initialized");

    let orchestrator = IngestOrchestrator::new(
        config.ingest.clone(),
        Arc::new(PgCategoryStore::new(pool.clone())),
        Arc::new(PgCatalogStore::new(pool.clone())),
        Arc::new(storage),
    );
    info!(
        concurrency = config.ingest.concurrency,
        folder = %config.ingest.media_folder,
        "Ingestion pipeline ready"
    );

    let feature_state = FeatureState {
        orchestrator,
        admin_token: AdminToken::new(&config.auth.admin_token),
    };

    let app = api::router(feature_state, &config).merge(api::database_routes(pool));

    api::serve(app, &config.server).await
}
