//! Product catalog feature
//!
//! Currently exposes the admin-only bulk import of products from a CSV file
//! and a bundle of images.

pub mod commands;
pub mod routes;

pub use commands::{BulkUploadCommand, BulkUploadError, BulkUploadResponse};

pub use routes::{products_routes, BulkUploadApiError};
