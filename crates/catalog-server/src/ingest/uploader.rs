//! Permit-gated uploads to the media store

use catalog_common::MediaDescriptor;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use super::error::RowError;
use super::stores::MediaStore;

/// Uploads row images while holding one I/O permit per call.
///
/// Cheap to clone. Clones share the media store and the permit pool.
#[derive(Clone)]
pub struct UploadCoordinator {
    store: Arc<dyn MediaStore>,
    permits: Arc<Semaphore>,
    folder: Arc<str>,
}

impl UploadCoordinator {
    pub fn new(store: Arc<dyn MediaStore>, permits: Arc<Semaphore>, folder: &str) -> Self {
        Self {
            store,
            permits,
            folder: Arc::from(folder),
        }
    }

    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Upload one asset. Any failure is a failure of the row; there is no
    /// placeholder fallback.
    #[instrument(skip(self, content), fields(bytes = content.len()))]
    pub async fn upload(&self, filename: &str, content: &[u8]) -> Result<MediaDescriptor, RowError> {
        let _permit = self.permits.acquire().await.map_err(|_| RowError::Upload {
            filename: filename.to_string(),
            reason: "upload permits closed".to_string(),
        })?;

        match self.store.upload(content, &self.folder).await {
            Ok(media) => {
                debug!(external_id = %media.external_id, "Image uploaded");
                Ok(media)
            },
            Err(e) => {
                warn!(error = %format!("{e:#}"), "Image upload failed");
                Err(RowError::Upload {
                    filename: filename.to_string(),
                    reason: format!("{e:#}"),
                })
            },
        }
    }

    /// Best-effort removal of an uploaded asset whose product never got saved.
    pub async fn discard(&self, media: &MediaDescriptor) {
        if media.is_placeholder() {
            return;
        }

        let Ok(_permit) = self.permits.acquire().await else {
            return;
        };

        if let Err(e) = self.store.delete(&media.external_id).await {
            warn!(
                external_id = %media.external_id,
                error = %format!("{e:#}"),
                "Failed to remove orphaned image"
            );
        }
    }
}
