//! Permit-gated product persistence

use catalog_common::CatalogItem;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

use super::error::RowError;
use super::models::{NewProduct, ResolvedRow};
use super::stores::CatalogStore;

/// Persists resolved rows as catalog items, one I/O permit per insert.
#[derive(Clone)]
pub struct EntityWriter {
    store: Arc<dyn CatalogStore>,
    permits: Arc<Semaphore>,
}

impl EntityWriter {
    pub fn new(store: Arc<dyn CatalogStore>, permits: Arc<Semaphore>) -> Self {
        Self { store, permits }
    }

    /// Insert one product. No retries.
    #[instrument(skip(self, row), fields(row = row.position))]
    pub async fn write(&self, row: ResolvedRow) -> Result<CatalogItem, RowError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| RowError::Persistence("persistence permits closed".to_string()))?;

        let item = self
            .store
            .insert_product(NewProduct::from(row))
            .await
            .map_err(|e| RowError::Persistence(format!("{e:#}")))?;

        debug!(product_id = %item.id, "Product created");
        Ok(item)
    }
}
