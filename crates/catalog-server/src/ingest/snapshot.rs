//! Per-batch lookup snapshots
//!
//! Both snapshots are built once before any row runs and are only read
//! afterwards, so they are shared between workers behind an `Arc` without
//! locking.

use catalog_common::Category;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::error::IngestError;
use super::models::NamedAsset;
use super::stores::CategoryStore;

/// Normalized category name to category id.
#[derive(Debug, Clone, Default)]
pub struct CategorySnapshot {
    by_name: HashMap<String, Uuid>,
}

impl CategorySnapshot {
    pub fn build(categories: impl IntoIterator<Item = Category>) -> Self {
        let by_name = categories
            .into_iter()
            .map(|category| (normalize(&category.name), category.id))
            .collect();

        Self { by_name }
    }

    /// Fetch every category from the store and snapshot it.
    pub async fn load(store: &dyn CategoryStore) -> Result<Self, IngestError> {
        let categories = store
            .list_categories()
            .await
            .map_err(IngestError::CategoryStore)?;

        let snapshot = Self::build(categories);
        tracing::debug!(categories = snapshot.len(), "Built category snapshot");
        Ok(snapshot)
    }

    /// Case-insensitive, whitespace-trimmed exact lookup.
    pub fn resolve(&self, name: &str) -> Option<Uuid> {
        self.by_name.get(&normalize(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trimmed filename to asset content. Filenames stay case-sensitive.
#[derive(Debug, Clone, Default)]
pub struct AssetSnapshot {
    by_filename: HashMap<String, Arc<[u8]>>,
}

impl AssetSnapshot {
    /// Later assets with the same trimmed filename replace earlier ones.
    pub fn build(assets: impl IntoIterator<Item = NamedAsset>) -> Self {
        let by_filename = assets
            .into_iter()
            .map(|asset| (asset.filename.trim().to_string(), Arc::<[u8]>::from(asset.content)))
            .collect();

        Self { by_filename }
    }

    pub fn get(&self, filename: &str) -> Option<Arc<[u8]>> {
        self.by_filename.get(filename.trim()).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_filename.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_filename.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_lookup_ignores_case_and_whitespace() {
        let id = Uuid::new_v4();
        let snapshot = CategorySnapshot::build([Category::new(id, "electronics")]);

        assert_eq!(snapshot.resolve("Electronics"), Some(id));
        assert_eq!(snapshot.resolve("electronics "), Some(id));
        assert_eq!(snapshot.resolve("  ELECTRONICS"), Some(id));
    }

    #[test]
    fn test_category_lookup_is_exact_after_normalization() {
        let snapshot = CategorySnapshot::build([Category::new(Uuid::new_v4(), "Electronics")]);

        assert_eq!(snapshot.resolve("Electronic"), None);
        assert_eq!(snapshot.resolve("Electronics & Gadgets"), None);
    }

    #[test]
    fn test_asset_lookup_trims_but_keeps_case() {
        let snapshot = AssetSnapshot::build([NamedAsset::new(" photo1.jpg ", b"jpeg".to_vec())]);

        assert_eq!(snapshot.get("photo1.jpg").as_deref(), Some(&b"jpeg"[..]));
        assert_eq!(snapshot.get("  photo1.jpg").as_deref(), Some(&b"jpeg"[..]));
        assert!(snapshot.get("Photo1.jpg").is_none());
    }

    #[test]
    fn test_duplicate_asset_names_keep_last() {
        let snapshot = AssetSnapshot::build([
            NamedAsset::new("a.png", b"first".to_vec()),
            NamedAsset::new("a.png", b"second".to_vec()),
        ]);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("a.png").as_deref(), Some(&b"second"[..]));
    }
}
