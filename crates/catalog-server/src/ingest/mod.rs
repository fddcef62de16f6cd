//! Bulk product ingestion
//!
//! Imports a CSV batch of products plus a bundle of named images in one
//! best-effort pass: every row succeeds or fails on its own and the caller gets
//! a per-row report back.
//!
//! # Architecture
//!
//! - **parser**: CSV bytes → ordered [`RawRow`]s
//! - **snapshot**: per-batch category and image lookups
//! - **validator**: required fields and typed conversion
//! - **uploader**: permit-gated image uploads ([`UploadCoordinator`])
//! - **writer**: permit-gated product inserts ([`EntityWriter`])
//! - **orchestrator**: worker pool, aggregation and cancellation
//! - **stores**: traits for the category, catalog and media collaborators
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_server::ingest::{IngestConfig, IngestOrchestrator, NamedAsset};
//!
//! let orchestrator = IngestOrchestrator::new(IngestConfig::default(), categories, catalog, media);
//! let report = orchestrator
//!     .run(csv_bytes, vec![NamedAsset::new("rice.jpg", jpeg_bytes)])
//!     .await?;
//! println!("{} created, {} failed", report.success_count(), report.error_count());
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod report;
pub mod snapshot;
pub mod stores;
pub mod uploader;
pub mod validator;
pub mod writer;

pub use config::IngestConfig;
pub use error::{IngestError, ParseError, RowError};
pub use models::{NamedAsset, NewProduct, ProductFields, RawRow, ResolvedRow, RowOutcome};
pub use orchestrator::IngestOrchestrator;
pub use parser::parse_rows;
pub use report::{BatchReport, RowErrorEntry};
pub use snapshot::{AssetSnapshot, CategorySnapshot};
pub use stores::{CatalogStore, CategoryStore, MediaStore};
pub use uploader::UploadCoordinator;
pub use validator::validate_row;
pub use writer::EntityWriter;
