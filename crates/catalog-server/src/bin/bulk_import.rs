//! Offline bulk import
//!
//! Runs a CSV batch plus a directory of images through the same ingestion
//! pipeline as `POST /api/v1/products/bulk-upload`, then prints the JSON
//! report to stdout.
//!
//! Usage:
//!   bulk-import --csv products.csv --images ./images [--concurrency 8] [--folder imports]
//!
//! Ctrl+C stops dispatching new rows. Rows already in flight finish and the
//! rest are reported as skipped.

use anyhow::{Context, Result};
use catalog_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use catalog_server::{
    config::DatabaseConfig,
    db::{self, PgCatalogStore, PgCategoryStore},
    ingest::{IngestConfig, IngestOrchestrator, NamedAsset},
    storage::{config::StorageConfig, Storage},
};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "bulk-import")]
#[command(author, version, about = "Import a product CSV and its images", long_about = None)]
struct Args {
    /// CSV file with one product per row
    #[arg(long)]
    csv: PathBuf,

    /// Directory whose files make up the image bundle
    #[arg(long)]
    images: Option<PathBuf>,

    /// Number of rows processed concurrently
    #[arg(long)]
    concurrency: Option<usize>,

    /// Storage folder for uploaded images
    #[arg(long)]
    folder: Option<String>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_config = LogConfig::builder()
        .level(if args.verbose { LogLevel::Debug } else { LogLevel::Info })
        .output(LogOutput::Console)
        .log_file_prefix("bulk-import")
        .build()
        .merge_env()?;
    init_logging(&log_config)?;

    let ingest_config = ingest_config(&args)?;

    let csv = tokio::fs::read(&args.csv)
        .await
        .with_context(|| format!("Failed to read CSV file {}", args.csv.display()))?;

    let assets = match &args.images {
        Some(dir) => load_assets(dir).await?,
        None => Vec::new(),
    };
    if assets.len() > ingest_config.max_images {
        warn!(
            images = assets.len(),
            max_images = ingest_config.max_images,
            "Image bundle exceeds the HTTP upload limit"
        );
    }
    info!(images = assets.len(), csv_bytes = csv.len(), "Loaded batch");

    let database = database_config(&args);
    let pool = db::create_pool(&database).await?;

    let storage = Storage::new(StorageConfig::from_env()?).await?;

    let orchestrator = IngestOrchestrator::new(
        ingest_config,
        Arc::new(PgCategoryStore::new(pool.clone())),
        Arc::new(PgCatalogStore::new(pool)),
        Arc::new(storage),
    );

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

    let report = orchestrator.run_with_cancel(&csv, assets, cancel).await?;

    if report.cancelled {
        warn!(skipped = report.skipped, "Import cancelled before all rows ran");
    }

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn ingest_config(args: &Args) -> Result<IngestConfig> {
    let mut config = IngestConfig::from_env()?;

    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(folder) = &args.folder {
        config = config.with_media_folder(folder.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Pool settings from the environment, with `--database-url` taking precedence
fn database_config(args: &Args) -> DatabaseConfig {
    let mut database = DatabaseConfig::from_env();
    if let Some(url) = &args.database_url {
        database.url = url.clone();
    }
    database
}

/// Every regular file in `dir`, keyed by its file name
async fn load_assets(dir: &Path) -> Result<Vec<NamedAsset>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to open image directory {}", dir.display()))?;

    let mut assets = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        let content = tokio::fs::read(entry.path())
            .await
            .with_context(|| format!("Failed to read image {}", filename))?;
        assets.push(NamedAsset::new(filename, content));
    }

    Ok(assets)
}

async fn cancel_on_ctrl_c(token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl+C, cancelling remaining rows");
            token.cancel();
        },
        Err(e) => tracing::error!("Failed to install Ctrl+C handler: {}", e),
    }
}
