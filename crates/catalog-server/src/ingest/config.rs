//! Ingestion configuration
//!
//! Settings for the bulk product import pipeline (`INGEST_*` environment
//! variables).

use serde::{Deserialize, Serialize};

/// Default number of rows processed concurrently.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default folder (key prefix) for uploaded product images.
pub const DEFAULT_MEDIA_FOLDER: &str = "wholesale_site/products";

/// Default maximum number of images accepted with one batch.
pub const DEFAULT_MAX_IMAGES: usize = 100;

/// Default maximum size of a bulk-upload request body (50 MiB).
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 50 * 1024 * 1024;

/// Bulk ingestion configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Upper bound on rows performing uploads or inserts at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Folder passed to the media store for every upload
    #[serde(default = "default_media_folder")]
    pub media_folder: String,
    /// Maximum number of `images` parts accepted per request
    #[serde(default = "default_max_images")]
    pub max_images: usize,
    /// Maximum accepted multipart body size in bytes
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_media_folder() -> String {
    DEFAULT_MEDIA_FOLDER.to_string()
}

fn default_max_images() -> usize {
    DEFAULT_MAX_IMAGES
}

fn default_max_request_bytes() -> usize {
    DEFAULT_MAX_REQUEST_BYTES
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            media_folder: default_media_folder(),
            max_images: default_max_images(),
            max_request_bytes: default_max_request_bytes(),
        }
    }
}

impl IngestConfig {
    /// Load ingestion configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            concurrency: std::env::var("INGEST_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CONCURRENCY),
            media_folder: std::env::var("INGEST_MEDIA_FOLDER")
                .unwrap_or_else(|_| DEFAULT_MEDIA_FOLDER.to_string()),
            max_images: std::env::var("INGEST_MAX_IMAGES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_IMAGES),
            max_request_bytes: std::env::var("INGEST_MAX_REQUEST_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_REQUEST_BYTES),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.concurrency == 0 {
            anyhow::bail!("INGEST_CONCURRENCY must be greater than 0");
        }
        if self.media_folder.trim_matches('/').trim().is_empty() {
            anyhow::bail!("INGEST_MEDIA_FOLDER cannot be empty");
        }
        if self.max_request_bytes == 0 {
            anyhow::bail!("INGEST_MAX_REQUEST_BYTES must be greater than 0");
        }
        Ok(())
    }

    /// Override the concurrency bound
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Override the media folder
    pub fn with_media_folder(mut self, folder: impl Into<String>) -> Self {
        self.media_folder = folder.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults() {
        let config = IngestConfig::default();
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.media_folder, "wholesale_site/products");
        assert_eq!(config.max_images, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = IngestConfig::default().with_concurrency(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_folder_rejected() {
        let config = IngestConfig::default().with_media_folder("//");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: IngestConfig = serde_json::from_str(r#"{"concurrency": 2}"#).unwrap();
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.media_folder, DEFAULT_MEDIA_FOLDER);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("INGEST_CONCURRENCY", "8");
        std::env::set_var("INGEST_MEDIA_FOLDER", "imports/products");

        let config = IngestConfig::from_env().unwrap();
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.media_folder, "imports/products");

        std::env::remove_var("INGEST_CONCURRENCY");
        std::env::remove_var("INGEST_MEDIA_FOLDER");
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_zero_concurrency() {
        std::env::set_var("INGEST_CONCURRENCY", "0");
        assert!(IngestConfig::from_env().is_err());
        std::env::remove_var("INGEST_CONCURRENCY");
    }
}
