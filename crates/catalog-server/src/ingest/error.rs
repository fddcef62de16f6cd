//! Ingestion error types
//!
//! Two tiers: [`IngestError`] aborts a whole batch before (or instead of)
//! producing a report, while [`RowError`] is scoped to one row and always ends
//! up as an entry in the [`BatchReport`](super::report::BatchReport).

use thiserror::Error;

/// The batch could not be decoded as CSV.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure of a single row pipeline.
///
/// The `Display` output is the user-facing reason that follows `Row N: ` in
/// the report.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("Missing required fields (title, rate, category)")]
    MissingFields,

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidField { field: &'static str, value: String },

    #[error("Category '{0}' not found")]
    CategoryNotFound(String),

    #[error("Image file '{0}' not provided")]
    AssetNotFound(String),

    #[error("Image upload failed for {filename}")]
    Upload { filename: String, reason: String },

    #[error("{0}")]
    Persistence(String),
}

impl RowError {
    /// Short machine-readable label, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            RowError::MissingFields => "missing_fields",
            RowError::InvalidField { .. } => "invalid_field",
            RowError::CategoryNotFound(_) => "category_not_found",
            RowError::AssetNotFound(_) => "asset_not_found",
            RowError::Upload { .. } => "upload",
            RowError::Persistence(_) => "persistence",
        }
    }
}

/// Batch-fatal ingestion failure. No partial report accompanies it.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to parse batch: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to load categories: {0:#}")]
    CategoryStore(anyhow::Error),

    #[error("Row worker failed: {0}")]
    Worker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_messages() {
        assert_eq!(
            RowError::MissingFields.to_string(),
            "Missing required fields (title, rate, category)"
        );
        assert_eq!(
            RowError::CategoryNotFound("Toys".into()).to_string(),
            "Category 'Toys' not found"
        );
        assert_eq!(
            RowError::AssetNotFound("photo1.jpg".into()).to_string(),
            "Image file 'photo1.jpg' not provided"
        );
        assert_eq!(
            RowError::Upload {
                filename: "a.png".into(),
                reason: "timeout".into()
            }
            .to_string(),
            "Image upload failed for a.png"
        );
        assert_eq!(
            RowError::InvalidField {
                field: "stock",
                value: "lots".into()
            }
            .to_string(),
            "Invalid value 'lots' for field 'stock'"
        );
    }

    #[test]
    fn test_category_store_error_includes_context() {
        let err = IngestError::CategoryStore(
            anyhow::anyhow!("connection refused").context("Failed to list categories"),
        );
        assert_eq!(
            err.to_string(),
            "Failed to load categories: Failed to list categories: connection refused"
        );
    }
}
