use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::{
    config::{Credentials, Region},
    primitives::ByteStream,
    Client,
};
use catalog_common::MediaDescriptor;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::ingest::MediaStore;

pub mod config;

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl Storage {
    pub async fn new(config: config::StorageConfig) -> Result<Self> {
        debug!(
            bucket = %config.bucket,
            endpoint = ?config.endpoint,
            region = %config.region,
            "Initializing storage"
        );

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "catalog-storage",
        );

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .force_path_style(config.path_style);

        if let Some(endpoint) = &config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(s3_config_builder.build());
        let public_base_url = config.public_base_url();

        info!("Storage client initialized for bucket: {}", config.bucket);

        Ok(Self {
            client,
            bucket: config.bucket,
            public_base_url,
        })
    }

    #[instrument(skip(self, data))]
    pub async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<UploadResult> {
        let checksum = calculate_sha256(&data);
        let size = data.len() as i64;

        debug!("Uploading {} bytes to s3://{}/{}", size, self.bucket, key);

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request.send().await.context("Failed to upload to S3")?;

        info!("Successfully uploaded to s3://{}/{}", self.bucket, key);

        Ok(UploadResult {
            key: key.to_string(),
            checksum,
            size,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<()> {
        debug!("Deleting s3://{}/{}", self.bucket, key);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .context(format!("Failed to delete from S3: {}", key))?;

        info!("Successfully deleted s3://{}/{}", self.bucket, key);

        Ok(())
    }

    /// Public URL of an object key
    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}

#[async_trait]
impl MediaStore for Storage {
    async fn upload(&self, content: &[u8], folder: &str) -> Result<MediaDescriptor> {
        let content_type = sniff_content_type(content);
        let key = build_media_key(folder, Uuid::new_v4(), content_type);

        let result = Storage::upload(self, &key, content.to_vec(), content_type).await?;
        debug!(key = %result.key, checksum = %result.checksum, size = result.size, "Media stored");

        Ok(MediaDescriptor::new(self.object_url(&result.key), result.key))
    }

    async fn delete(&self, external_id: &str) -> Result<()> {
        Storage::delete(self, external_id).await
    }
}

#[derive(Debug, Clone)]
pub struct UploadResult {
    pub key: String,
    pub checksum: String,
    pub size: i64,
}

/// `{folder}/{id}.{ext}` with surrounding slashes removed from the folder
pub fn build_media_key(folder: &str, id: Uuid, content_type: Option<&str>) -> String {
    let folder = folder.trim_matches('/');
    match content_type.and_then(extension_for) {
        Some(ext) => format!("{}/{}.{}", folder, id, ext),
        None => format!("{}/{}", folder, id),
    }
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Detect common image formats from their magic bytes
fn sniff_content_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

fn calculate_sha256(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_media_key() {
        let id = Uuid::nil();
        assert_eq!(
            build_media_key("/wholesale_site/products/", id, Some("image/png")),
            "wholesale_site/products/00000000-0000-0000-0000-000000000000.png"
        );
        assert_eq!(
            build_media_key("imports", id, None),
            "imports/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn test_sniff_content_type() {
        assert_eq!(sniff_content_type(&[0xFF, 0xD8, 0xFF, 0xE0]), Some("image/jpeg"));
        assert_eq!(sniff_content_type(b"\x89PNG\r\n\x1a\n...."), Some("image/png"));
        assert_eq!(sniff_content_type(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff_content_type(b"plain text"), None);
    }

    #[test]
    fn test_object_url() {
        let storage = Storage {
            client: Client::from_conf(aws_sdk_s3::Config::builder().build()),
            bucket: "media".to_string(),
            public_base_url: "https://cdn.example.com".to_string(),
        };

        assert_eq!(
            storage.object_url("wholesale_site/products/a.jpg"),
            "https://cdn.example.com/wholesale_site/products/a.jpg"
        );
    }

    #[test]
    fn test_calculate_sha256() {
        let data = b"Hello, World!";
        let checksum = calculate_sha256(data);
        assert_eq!(
            checksum,
            "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f"
        );
    }
}
