//! Batch report and the collector that builds it

use catalog_common::CatalogItem;
use serde::Serialize;
use std::fmt;

use super::models::RowOutcome;

/// One failed row in a [`BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowErrorEntry {
    pub position: usize,
    pub message: String,
}

impl fmt::Display for RowErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.position, self.message)
    }
}

/// Aggregated outcome of one batch.
///
/// `created` and `errors` are both ordered by row position, regardless of the
/// order in which rows finished.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub total_rows: usize,
    pub created: Vec<CatalogItem>,
    pub errors: Vec<RowErrorEntry>,
    pub cancelled: bool,
    pub skipped: usize,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.created.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Summary line returned to API callers.
    pub fn message(&self) -> String {
        format!("Processed {} rows", self.total_rows)
    }

    /// Error entries rendered as `Row N: reason`.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Every row is accounted for exactly once.
    pub fn is_consistent(&self) -> bool {
        self.success_count() + self.error_count() + self.skipped == self.total_rows
    }
}

/// Accumulates outcomes from the single aggregation consumer.
#[derive(Debug, Default)]
pub struct ReportCollector {
    created: Vec<(usize, CatalogItem)>,
    errors: Vec<RowErrorEntry>,
}

impl ReportCollector {
    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Created { position, item } => self.created.push((position, item)),
            RowOutcome::Failed { position, error } => self.errors.push(RowErrorEntry {
                position,
                message: error.to_string(),
            }),
        }
    }

    /// Number of outcomes recorded so far.
    pub fn len(&self) -> usize {
        self.created.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn finish(mut self, total_rows: usize, cancelled: bool) -> BatchReport {
        self.created.sort_by_key(|(position, _)| *position);
        self.errors.sort_by_key(|entry| entry.position);

        let skipped = total_rows.saturating_sub(self.len());

        BatchReport {
            total_rows,
            created: self.created.into_iter().map(|(_, item)| item).collect(),
            errors: self.errors,
            cancelled,
            skipped,
        }
    }
}
