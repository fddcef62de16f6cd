//! Data models for bulk ingestion
//!
//! Everything here is batch-scoped: built when a batch starts and dropped once
//! the report is returned.

use catalog_common::{CatalogItem, MediaDescriptor};
use std::collections::HashMap;
use uuid::Uuid;

use super::error::RowError;

/// One parsed CSV data row.
///
/// `position` is 1-based and counts data rows only, so the first row after the
/// header is row 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub position: usize,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new(position: usize, fields: HashMap<String, String>) -> Self {
        Self { position, fields }
    }

    /// Raw cell value, untouched.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Trimmed cell value, or `None` when the cell is absent or blank.
    pub fn non_blank(&self, field: &str) -> Option<&str> {
        self.get(field).map(str::trim).filter(|v| !v.is_empty())
    }
}

/// A named binary attachment from the media bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedAsset {
    pub filename: String,
    pub content: Vec<u8>,
}

impl NamedAsset {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }
}

/// Typed product fields of a row that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub title: String,
    pub rate: f64,
    pub rating: f64,
    pub description: String,
    pub stock: i32,
    pub min_order_quantity: i32,
}

/// A row that passed validation but whose references are not yet resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRow {
    pub position: usize,
    pub fields: ProductFields,
    /// Category name as written in the CSV (trimmed)
    pub category: String,
    /// Image filename as written in the CSV (trimmed), if any
    pub image: Option<String>,
}

impl ValidatedRow {
    pub fn resolve(self, category_id: Uuid, image: MediaDescriptor) -> ResolvedRow {
        ResolvedRow {
            position: self.position,
            fields: self.fields,
            category_id,
            image,
        }
    }
}

/// A row ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRow {
    pub position: usize,
    pub fields: ProductFields,
    pub category_id: Uuid,
    pub image: MediaDescriptor,
}

/// Insert payload handed to the catalog store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub title: String,
    pub category_id: Uuid,
    pub rate: f64,
    pub rating: f64,
    pub description: String,
    pub image: MediaDescriptor,
    pub stock: i32,
    pub min_order_quantity: i32,
    pub is_active: bool,
    pub is_offer_of_day: bool,
    pub is_featured: bool,
}

impl From<ResolvedRow> for NewProduct {
    fn from(row: ResolvedRow) -> Self {
        Self {
            title: row.fields.title,
            category_id: row.category_id,
            rate: row.fields.rate,
            rating: row.fields.rating,
            description: row.fields.description,
            image: row.image,
            stock: row.fields.stock,
            min_order_quantity: row.fields.min_order_quantity,
            is_active: true,
            is_offer_of_day: false,
            is_featured: false,
        }
    }
}

/// Result of one row pipeline. Exactly one is produced per processed row.
#[derive(Debug)]
pub enum RowOutcome {
    Created { position: usize, item: CatalogItem },
    Failed { position: usize, error: RowError },
}

impl RowOutcome {
    pub fn position(&self) -> usize {
        match self {
            RowOutcome::Created { position, .. } | RowOutcome::Failed { position, .. } => {
                *position
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        RawRow::new(
            1,
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_non_blank_trims_and_drops_empty_cells() {
        let row = row(&[("title", "  Rice "), ("image", "   ")]);
        assert_eq!(row.non_blank("title"), Some("Rice"));
        assert_eq!(row.get("title"), Some("  Rice "));
        assert_eq!(row.non_blank("image"), None);
        assert_eq!(row.non_blank("missing"), None);
    }

    #[test]
    fn test_new_product_defaults_flags() {
        let resolved = ResolvedRow {
            position: 4,
            fields: ProductFields {
                title: "Rice".into(),
                rate: 10.0,
                rating: 0.0,
                description: String::new(),
                stock: 0,
                min_order_quantity: 1,
            },
            category_id: Uuid::new_v4(),
            image: MediaDescriptor::placeholder(),
        };

        let product = NewProduct::from(resolved);
        assert!(product.is_active);
        assert!(!product.is_offer_of_day);
        assert!(!product.is_featured);
        assert_eq!(product.min_order_quantity, 1);
    }
}
