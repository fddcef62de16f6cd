//! Bulk ingestion orchestrator
//!
//! Drives one batch from raw CSV bytes to a [`BatchReport`]:
//!
//! 1. Parse every row up front (a parse failure aborts the batch).
//! 2. Build the category and asset snapshots concurrently.
//! 3. Start `concurrency` workers that pull rows from a shared queue and run
//!    each through validate → resolve category → upload image → insert.
//! 4. Funnel every row outcome through a channel to a single aggregator, which
//!    produces the position-ordered report.
//!
//! Uploads and inserts additionally share one semaphore with `concurrency`
//! permits, so no more than that many remote calls are in flight at once.

use catalog_common::{CatalogItem, MediaDescriptor};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::{
    config::IngestConfig,
    error::{IngestError, RowError},
    models::{NamedAsset, RawRow, RowOutcome},
    parser::parse_rows,
    report::{BatchReport, ReportCollector},
    snapshot::{AssetSnapshot, CategorySnapshot},
    stores::{CatalogStore, CategoryStore, MediaStore},
    uploader::UploadCoordinator,
    validator::validate_row,
    writer::EntityWriter,
};

type RowQueue = Arc<Mutex<mpsc::UnboundedReceiver<RawRow>>>;

/// Runs bulk product imports against the configured stores
#[derive(Clone)]
pub struct IngestOrchestrator {
    config: IngestConfig,
    categories: Arc<dyn CategoryStore>,
    catalog: Arc<dyn CatalogStore>,
    media: Arc<dyn MediaStore>,
}

/// Read-only state shared by every row pipeline of one batch
struct RowContext {
    categories: CategorySnapshot,
    assets: AssetSnapshot,
    uploader: UploadCoordinator,
    writer: EntityWriter,
}

impl IngestOrchestrator {
    pub fn new(
        config: IngestConfig,
        categories: Arc<dyn CategoryStore>,
        catalog: Arc<dyn CatalogStore>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            config,
            categories,
            catalog,
            media,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingest one batch to completion.
    pub async fn run(
        &self,
        csv: &[u8],
        assets: Vec<NamedAsset>,
    ) -> Result<BatchReport, IngestError> {
        self.run_with_cancel(csv, assets, CancellationToken::new())
            .await
    }

    /// Ingest one batch, stopping early once `cancel` fires.
    ///
    /// Rows already started finish normally and keep their outcomes. Rows not
    /// yet started are counted in [`BatchReport::skipped`].
    #[instrument(
        skip_all,
        fields(bytes = csv.len(), assets = assets.len(), concurrency = self.config.concurrency)
    )]
    pub async fn run_with_cancel(
        &self,
        csv: &[u8],
        assets: Vec<NamedAsset>,
        cancel: CancellationToken,
    ) -> Result<BatchReport, IngestError> {
        let started = Instant::now();

        let rows = parse_rows(csv)?;
        let total_rows = rows.len();

        let (categories, assets) = tokio::join!(
            CategorySnapshot::load(self.categories.as_ref()),
            async move { AssetSnapshot::build(assets) },
        );
        let categories = categories?;

        info!(
            total_rows,
            categories = categories.len(),
            assets = assets.len(),
            "Starting bulk ingestion"
        );

        let concurrency = self.config.concurrency.max(1);
        let permits = Arc::new(Semaphore::new(concurrency));
        let context = Arc::new(RowContext {
            categories,
            assets,
            uploader: UploadCoordinator::new(
                self.media.clone(),
                permits.clone(),
                &self.config.media_folder,
            ),
            writer: EntityWriter::new(self.catalog.clone(), permits),
        });

        let (row_tx, row_rx) = mpsc::unbounded_channel();
        for row in rows {
            row_tx
                .send(row)
                .map_err(|_| IngestError::Worker("row queue closed".to_string()))?;
        }
        drop(row_tx);
        let queue: RowQueue = Arc::new(Mutex::new(row_rx));

        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let aggregator = tokio::spawn(aggregate(outcome_rx));

        let mut workers = JoinSet::new();
        for worker_id in 0..concurrency.min(total_rows) {
            workers.spawn(run_worker(
                worker_id,
                context.clone(),
                queue.clone(),
                outcome_tx.clone(),
                cancel.clone(),
            ));
        }
        drop(outcome_tx);

        let mut worker_failure = None;
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Row worker terminated abnormally");
                worker_failure.get_or_insert_with(|| e.to_string());
            }
        }

        let collector = aggregator
            .await
            .map_err(|e| IngestError::Worker(e.to_string()))?;

        if let Some(failure) = worker_failure {
            return Err(IngestError::Worker(failure));
        }

        let cancelled = cancel.is_cancelled() && collector.len() < total_rows;
        let report = collector.finish(total_rows, cancelled);

        info!(
            total_rows,
            created = report.success_count(),
            failed = report.error_count(),
            skipped = report.skipped,
            cancelled = report.cancelled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Bulk ingestion finished"
        );

        Ok(report)
    }
}

async fn run_worker(
    worker_id: usize,
    context: Arc<RowContext>,
    queue: RowQueue,
    outcomes: mpsc::UnboundedSender<RowOutcome>,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(worker_id, "Cancellation requested, worker stopping");
                break;
            },
            next = async { queue.lock().await.recv().await } => next,
        };
        let Some(row) = next else {
            break;
        };

        let outcome = process_row(&context, row).await;
        if outcomes.send(outcome).is_err() {
            break;
        }
    }
}

async fn aggregate(mut outcomes: mpsc::UnboundedReceiver<RowOutcome>) -> ReportCollector {
    let mut collector = ReportCollector::default();
    while let Some(outcome) = outcomes.recv().await {
        collector.record(outcome);
    }
    collector
}

async fn process_row(context: &RowContext, row: RawRow) -> RowOutcome {
    let position = row.position;

    match run_pipeline(context, &row).await {
        Ok(item) => RowOutcome::Created { position, item },
        Err(error) => {
            warn!(row = position, kind = error.kind(), error = %error, "Row rejected");
            RowOutcome::Failed { position, error }
        },
    }
}

async fn run_pipeline(context: &RowContext, row: &RawRow) -> Result<CatalogItem, RowError> {
    let validated = validate_row(row)?;

    let category_id = context
        .categories
        .resolve(&validated.category)
        .ok_or_else(|| RowError::CategoryNotFound(validated.category.clone()))?;

    let image = match validated.image.as_deref() {
        Some(filename) => {
            let content = context
                .assets
                .get(filename)
                .ok_or_else(|| RowError::AssetNotFound(filename.to_string()))?;
            context.uploader.upload(filename, &content).await?
        },
        None => MediaDescriptor::placeholder(),
    };

    let resolved = validated.resolve(category_id, image.clone());

    match context.writer.write(resolved).await {
        Ok(item) => Ok(item),
        Err(e) => {
            context.uploader.discard(&image).await;
            Err(e)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::models::NewProduct;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct UnusedStore;

    #[async_trait]
    impl CatalogStore for UnusedStore {
        async fn insert_product(&self, _product: NewProduct) -> anyhow::Result<CatalogItem> {
            anyhow::bail!("not expected")
        }
    }

    #[async_trait]
    impl MediaStore for UnusedStore {
        async fn upload(&self, _content: &[u8], _folder: &str) -> anyhow::Result<MediaDescriptor> {
            anyhow::bail!("not expected")
        }

        async fn delete(&self, _external_id: &str) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn context() -> Arc<RowContext> {
        let permits = Arc::new(Semaphore::new(1));
        Arc::new(RowContext {
            categories: CategorySnapshot::build(Vec::new()),
            assets: AssetSnapshot::build(Vec::new()),
            uploader: UploadCoordinator::new(Arc::new(UnusedStore), permits.clone(), "products"),
            writer: EntityWriter::new(Arc::new(UnusedStore), permits),
        })
    }

    #[tokio::test]
    async fn test_worker_waiting_on_queue_stops_when_cancelled() {
        let (row_tx, row_rx) = mpsc::unbounded_channel();
        row_tx.send(RawRow::new(1, HashMap::new())).unwrap();
        drop(row_tx);
        let queue: RowQueue = Arc::new(Mutex::new(row_rx));

        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let guard = queue.lock().await;
        let worker = tokio::spawn(run_worker(
            0,
            context(),
            queue.clone(),
            outcome_tx,
            cancel.clone(),
        ));
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        cancel.cancel();
        drop(guard);
        worker.await.unwrap();

        assert!(outcome_rx.recv().await.is_none());
        assert!(queue.lock().await.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_worker_drains_queue_when_not_cancelled() {
        let (row_tx, row_rx) = mpsc::unbounded_channel();
        row_tx.send(RawRow::new(1, HashMap::new())).unwrap();
        row_tx.send(RawRow::new(2, HashMap::new())).unwrap();
        drop(row_tx);
        let queue: RowQueue = Arc::new(Mutex::new(row_rx));

        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
        run_worker(0, context(), queue, outcome_tx, CancellationToken::new()).await;

        let mut positions = Vec::new();
        while let Some(outcome) = outcome_rx.recv().await {
            assert!(matches!(outcome, RowOutcome::Failed { error: RowError::MissingFields, .. }));
            positions.push(outcome.position());
        }
        assert_eq!(positions, [1, 2]);
    }
}
