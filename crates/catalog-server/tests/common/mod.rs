//! In-memory collaborators for ingestion integration tests
//!
//! Each fake implements one of the ingestion store traits and records what it
//! was asked to do. Failures and latency can be injected per test, and a
//! shared [`ConcurrencyGauge`] tracks how many remote calls were in flight at
//! the same time.

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use catalog_common::{CatalogItem, Category, MediaDescriptor};
use catalog_server::ingest::{
    CatalogStore, CategoryStore, IngestConfig, IngestOrchestrator, MediaStore, NewProduct,
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

// ============================================================================
// Concurrency gauge
// ============================================================================

/// Counts concurrent calls and remembers the peak
#[derive(Debug, Default)]
pub struct ConcurrencyGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl ConcurrencyGauge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

async fn observed<T>(
    gauge: Option<&ConcurrencyGauge>,
    latency: Duration,
    call: impl std::future::Future<Output = T>,
) -> T {
    if let Some(gauge) = gauge {
        gauge.enter();
    }
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
    let result = call.await;
    if let Some(gauge) = gauge {
        gauge.exit();
    }
    result
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Default)]
pub struct FakeCategoryStore {
    categories: Vec<Category>,
    unavailable: bool,
}

impl FakeCategoryStore {
    pub fn with_names(names: &[&str]) -> Self {
        Self {
            categories: names
                .iter()
                .map(|name| Category::new(Uuid::new_v4(), *name))
                .collect(),
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            categories: Vec::new(),
            unavailable: true,
        }
    }

    pub fn id_of(&self, name: &str) -> Option<Uuid> {
        self.categories.iter().find(|c| c.name == name).map(|c| c.id)
    }
}

#[async_trait]
impl CategoryStore for FakeCategoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        if self.unavailable {
            bail!("category table unavailable");
        }
        Ok(self.categories.clone())
    }
}

// ============================================================================
// Catalog
// ============================================================================

#[derive(Debug, Default)]
pub struct FakeCatalogStore {
    inserted: Mutex<Vec<CatalogItem>>,
    reject_titles: HashSet<String>,
    latency: Duration,
    gauge: Option<Arc<ConcurrencyGauge>>,
}

impl FakeCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail inserts whose title matches
    pub fn rejecting(mut self, title: &str) -> Self {
        self.reject_titles.insert(title.to_string());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_gauge(mut self, gauge: Arc<ConcurrencyGauge>) -> Self {
        self.gauge = Some(gauge);
        self
    }

    pub fn inserted(&self) -> Vec<CatalogItem> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogStore for FakeCatalogStore {
    async fn insert_product(&self, product: NewProduct) -> Result<CatalogItem> {
        observed(self.gauge.as_deref(), self.latency, async {
            if self.reject_titles.contains(&product.title) {
                bail!("insert rejected for '{}'", product.title);
            }

            let now = Utc::now();
            let item = CatalogItem {
                id: Uuid::new_v4(),
                title: product.title,
                category_id: product.category_id,
                rate: product.rate,
                rating: product.rating,
                description: product.description,
                image: product.image,
                stock: product.stock,
                min_order_quantity: product.min_order_quantity,
                is_active: product.is_active,
                is_offer_of_day: product.is_offer_of_day,
                is_featured: product.is_featured,
                created_at: now,
                updated_at: now,
            };
            self.inserted.lock().unwrap().push(item.clone());
            Ok(item)
        })
        .await
    }
}

// ============================================================================
// Media
// ============================================================================

/// One upload seen by [`FakeMediaStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub folder: String,
    pub content: Vec<u8>,
    pub external_id: String,
}

#[derive(Debug, Default)]
pub struct FakeMediaStore {
    uploads: Mutex<Vec<RecordedUpload>>,
    deleted: Mutex<Vec<String>>,
    unavailable: bool,
    latency: Duration,
    gauge: Option<Arc<ConcurrencyGauge>>,
}

impl FakeMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_gauge(mut self, gauge: Arc<ConcurrencyGauge>) -> Self {
        self.gauge = Some(gauge);
        self
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload(&self, content: &[u8], folder: &str) -> Result<MediaDescriptor> {
        observed(self.gauge.as_deref(), self.latency, async {
            if self.unavailable {
                bail!("media host unreachable");
            }

            let external_id = format!("{}/{}", folder, Uuid::new_v4());
            self.uploads.lock().unwrap().push(RecordedUpload {
                folder: folder.to_string(),
                content: content.to_vec(),
                external_id: external_id.clone(),
            });
            Ok(MediaDescriptor::new(
                format!("https://media.test/{}", external_id),
                external_id,
            ))
        })
        .await
    }

    async fn delete(&self, external_id: &str) -> Result<()> {
        self.deleted.lock().unwrap().push(external_id.to_string());
        Ok(())
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// The fakes behind one orchestrator, kept so tests can inspect them
pub struct Harness {
    pub categories: Arc<FakeCategoryStore>,
    pub catalog: Arc<FakeCatalogStore>,
    pub media: Arc<FakeMediaStore>,
    pub orchestrator: IngestOrchestrator,
}

impl Harness {
    pub fn new(
        concurrency: usize,
        categories: FakeCategoryStore,
        catalog: FakeCatalogStore,
        media: FakeMediaStore,
    ) -> Self {
        Self::with_config(
            IngestConfig::default().with_concurrency(concurrency),
            categories,
            catalog,
            media,
        )
    }

    pub fn with_config(
        config: IngestConfig,
        categories: FakeCategoryStore,
        catalog: FakeCatalogStore,
        media: FakeMediaStore,
    ) -> Self {
        let categories = Arc::new(categories);
        let catalog = Arc::new(catalog);
        let media = Arc::new(media);

        let orchestrator = IngestOrchestrator::new(
            config,
            categories.clone(),
            catalog.clone(),
            media.clone(),
        );

        Self {
            categories,
            catalog,
            media,
            orchestrator,
        }
    }

    /// Default harness with the categories used across most scenarios
    pub fn standard() -> Self {
        Self::new(
            5,
            FakeCategoryStore::with_names(&["Grains", "Spices", "Oils"]),
            FakeCatalogStore::new(),
            FakeMediaStore::new(),
        )
    }
}

/// Minimal valid JPEG header followed by a marker byte
pub fn jpeg(marker: u8) -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0, marker]
}
