//! Catalog Server Library
//!
//! HTTP server for a wholesale product catalog.
//!
//! # Overview
//!
//! - **Bulk ingestion**: CSV plus image bundle imports with a per-row report
//! - **Database Management**: PostgreSQL integration with SQLx
//! - **Storage Backend**: S3-compatible media storage
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS, request logging and the admin token gate
//!
//! # Architecture
//!
//! HTTP concerns live in vertical feature slices (`features/`), each with its
//! commands and routes. The slices delegate to the [`ingest`] pipeline, which
//! only talks to the outside world through the [`ingest::CategoryStore`],
//! [`ingest::CatalogStore`] and [`ingest::MediaStore`] traits. The [`db`] and
//! [`storage`] modules provide the production implementations.
//!
//! # Example
//!
//! ```no_run
//! use catalog_server::{api, config::Config};
//!
//! # async fn run(feature_state: catalog_server::features::FeatureState) -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let app = api::router(feature_state, &config);
//! api::serve(app, &config.server).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod features;
pub mod ingest;
pub mod middleware;
pub mod storage;

// Re-export commonly used types
pub use error::AppError;
