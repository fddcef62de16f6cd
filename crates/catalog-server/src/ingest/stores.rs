//! Collaborator interfaces used by the ingestion pipeline
//!
//! Production implementations live in [`crate::db`] (Postgres) and
//! [`crate::storage`] (S3-compatible object storage). Tests provide in-memory
//! versions.

use anyhow::Result;
use async_trait::async_trait;
use catalog_common::{CatalogItem, Category, MediaDescriptor};

use super::models::NewProduct;

/// Read access to the category table
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Fetch every known category
    async fn list_categories(&self) -> Result<Vec<Category>>;
}

/// Write access to the product table
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Persist one product and return the stored record
    async fn insert_product(&self, product: NewProduct) -> Result<CatalogItem>;
}

/// Remote media hosting
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload `content` under `folder` and return where it can be fetched
    async fn upload(&self, content: &[u8], folder: &str) -> Result<MediaDescriptor>;

    /// Remove a previously uploaded asset by its external id
    async fn delete(&self, external_id: &str) -> Result<()>;
}
