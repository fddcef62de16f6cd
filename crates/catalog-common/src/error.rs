//! Error types shared across the catalog crates

use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Main error type for the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Build a configuration error for an unrecognised value of a named setting
    pub fn invalid_setting(setting: &str, value: &str) -> Self {
        Self::Config(format!("Invalid {}: {}", setting, value))
    }
}
