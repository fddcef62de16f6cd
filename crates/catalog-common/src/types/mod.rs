//! Catalog domain types shared by the server and the import tooling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// URL served for products that were imported without an image
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// External identifier paired with [`PLACEHOLDER_IMAGE_URL`]
pub const PLACEHOLDER_EXTERNAL_ID: &str = "placeholder";

// ============================================================================
// Categories
// ============================================================================

/// A product category as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

impl Category {
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// ============================================================================
// Media
// ============================================================================

/// Reference to an asset hosted by the remote media store.
///
/// `external_id` is the handle the media store uses for later deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDescriptor {
    pub url: String,
    pub external_id: String,
}

impl MediaDescriptor {
    pub fn new(url: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            external_id: external_id.into(),
        }
    }

    /// Fixed descriptor used when a row names no image.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_IMAGE_URL, PLACEHOLDER_EXTERNAL_ID)
    }

    pub fn is_placeholder(&self) -> bool {
        self.external_id == PLACEHOLDER_EXTERNAL_ID
    }
}

// ============================================================================
// Products
// ============================================================================

/// A sellable item in the catalog.
///
/// Serialized in camelCase since this is what the storefront consumes:
///
/// ```json
/// {
///   "id": "5f0c…",
///   "title": "Basmati Rice 5kg",
///   "categoryId": "9a1e…",
///   "rate": 12.5,
///   "rating": 0.0,
///   "description": "",
///   "image": { "url": "https://via.placeholder.com/150", "externalId": "placeholder" },
///   "stock": 40,
///   "minOrderQuantity": 1,
///   "isActive": true,
///   "isOfferOfDay": false,
///   "isFeatured": false,
///   "createdAt": "2026-01-18T10:00:00Z",
///   "updatedAt": "2026-01-18T10:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: Uuid,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_descriptor() {
        let media = MediaDescriptor::placeholder();
        assert_eq!(media.url, "https://via.placeholder.com/150");
        assert_eq!(media.external_id, "placeholder");
        assert!(media.is_placeholder());
        assert!(!MediaDescriptor::new("https://cdn/x.jpg", "products/x.jpg").is_placeholder());
    }

    #[test]
    fn test_catalog_item_serializes_camel_case() {
        let now = Utc::now();
        let item = CatalogItem {
            id: Uuid::new_v4(),
            title: "Rice".to_string(),
            category_id: Uuid::new_v4(),
            rate: 12.5,
            rating: 0.0,
            description: String::new(),
            image: MediaDescriptor::placeholder(),
            stock: 3,
            min_order_quantity: 1,
            is_active: true,
            is_offer_of_day: false,
            is_featured: false,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["minOrderQuantity"], 1);
        assert_eq!(json["isActive"], true);
        assert_eq!(json["image"]["externalId"], "placeholder");
        assert!(json.get("category_id").is_none());
    }
}
