use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub path_style: bool,
    /// Base URL under which uploaded objects are publicly served (CDN or
    /// bucket website). Falls back to `endpoint/bucket` when unset.
    pub public_url: Option<String>,
}

impl StorageConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let config = Self {
            endpoint: env::var("S3_ENDPOINT").ok(),
            region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "catalog-media".to_string()),
            access_key: env::var("S3_ACCESS_KEY")
                .or_else(|_| env::var("AWS_ACCESS_KEY_ID"))
                .unwrap_or_else(|_| "minioadmin".to_string()),
            secret_key: env::var("S3_SECRET_KEY")
                .or_else(|_| env::var("AWS_SECRET_ACCESS_KEY"))
                .unwrap_or_else(|_| "minioadmin".to_string()),
            path_style: env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            public_url: env::var("S3_PUBLIC_URL").ok().filter(|v| !v.trim().is_empty()),
        };

        if config.bucket.trim().is_empty() {
            anyhow::bail!("S3_BUCKET cannot be empty");
        }

        Ok(config)
    }

    pub fn for_minio(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            region: "us-east-1".to_string(),
            bucket: bucket.into(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            path_style: true,
            public_url: None,
        }
    }

    /// Base URL that object keys are appended to
    pub fn public_base_url(&self) -> String {
        match (&self.public_url, &self.endpoint) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, Some(endpoint)) => {
                format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket)
            },
            (None, None) => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_for_minio() {
        let config = StorageConfig::for_minio("http://localhost:9000", "test-bucket");
        assert_eq!(config.endpoint, Some("http://localhost:9000".to_string()));
        assert_eq!(config.bucket, "test-bucket");
        assert!(config.path_style);
        assert_eq!(config.access_key, "minioadmin");
    }

    #[test]
    fn test_public_base_url_prefers_explicit_url() {
        let mut config = StorageConfig::for_minio("http://localhost:9000/", "media");
        assert_eq!(config.public_base_url(), "http://localhost:9000/media");

        config.public_url = Some("https://cdn.example.com/".to_string());
        assert_eq!(config.public_base_url(), "https://cdn.example.com");

        config.public_url = None;
        config.endpoint = None;
        config.region = "eu-west-1".to_string();
        assert_eq!(
            config.public_base_url(),
            "https://media.s3.eu-west-1.amazonaws.com"
        );
    }

    #[test]
    #[serial]
    fn test_from_env() {
        env::set_var("S3_BUCKET", "products");
        env::set_var("S3_PUBLIC_URL", "https://img.example.com");

        let config = StorageConfig::from_env().unwrap();
        assert_eq!(config.bucket, "products");
        assert_eq!(config.public_url.as_deref(), Some("https://img.example.com"));

        env::remove_var("S3_BUCKET");
        env::remove_var("S3_PUBLIC_URL");
    }
}
