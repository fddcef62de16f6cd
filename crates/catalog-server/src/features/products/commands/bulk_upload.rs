//! Bulk product upload command
//!
//! Accepts one CSV file (`csvFile`) plus up to `max_images` image parts
//! (`images`) in a single multipart request and runs them through the
//! ingestion pipeline.
//!
//! # Architecture
//!
//! - Command: the decoded request (CSV bytes and named images) plus validation
//! - Handler: standalone async function that runs the orchestrator and shapes
//!   the report into the API response

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use catalog_common::CatalogItem;
use serde::Serialize;

use crate::ingest::{BatchReport, IngestError, IngestOrchestrator, NamedAsset};

/// Multipart field carrying the CSV batch
pub const CSV_FIELD: &str = "csvFile";

/// Multipart field carrying product images (repeatable)
pub const IMAGES_FIELD: &str = "images";

/// Command to import a batch of products
#[derive(Debug, Clone, Default)]
pub struct BulkUploadCommand {
    /// Raw CSV bytes, `None` when the request carried no `csvFile` part
    pub csv: Option<Vec<u8>>,

    /// Image parts keyed by their original filename
    pub images: Vec<NamedAsset>,

    /// Maximum number of image parts accepted
    pub max_images: usize,
}

/// Response body of a processed batch
///
/// ```json
/// {
///   "message": "Processed 3 rows",
///   "successCount": 2,
///   "errorCount": 1,
///   "errors": ["Row 2: Missing required fields (title, rate, category)"],
///   "createdProducts": [ ... ]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadResponse {
    pub message: String,
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<String>,
    pub created_products: Vec<CatalogItem>,
}

impl From<BatchReport> for BulkUploadResponse {
    fn from(report: BatchReport) -> Self {
        Self {
            message: report.message(),
            success_count: report.success_count(),
            error_count: report.error_count(),
            errors: report.error_messages(),
            created_products: report.created,
        }
    }
}

/// Errors that can occur when handling a bulk upload
#[derive(Debug, thiserror::Error)]
pub enum BulkUploadError {
    #[error("Please upload a CSV file")]
    MissingCsv,

    #[error("Too many images: at most {max} may be uploaded at once")]
    TooManyImages { max: usize },

    #[error("Unexpected field '{0}'")]
    UnexpectedField(String),

    /// Malformed body, or one that exceeded the request size limit
    #[error("Invalid multipart request: {message}")]
    Multipart { status: StatusCode, message: String },

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<MultipartError> for BulkUploadError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl BulkUploadCommand {
    /// Decode a multipart request body
    ///
    /// # Errors
    ///
    /// - `UnexpectedField` for parts other than `csvFile` and `images`, or a
    ///   second `csvFile`
    /// - `TooManyImages` once more than `max_images` image parts arrive
    /// - `Multipart` when the body is malformed or over the size limit, carrying
    ///   the status axum assigns to the failure
    pub async fn from_multipart(
        mut multipart: Multipart,
        max_images: usize,
    ) -> Result<Self, BulkUploadError> {
        let mut command = Self {
            max_images,
            ..Self::default()
        };

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);

            match name.as_str() {
                CSV_FIELD if command.csv.is_none() => {
                    let bytes = field.bytes().await?;
                    command.csv = Some(bytes.to_vec());
                },
                IMAGES_FIELD => {
                    if command.images.len() >= max_images {
                        return Err(BulkUploadError::TooManyImages { max: max_images });
                    }
                    let bytes = field.bytes().await?;
                    match file_name {
                        Some(file_name) => command.images.push(NamedAsset::new(file_name, bytes.to_vec())),
                        None => tracing::debug!("Ignoring image part without a filename"),
                    }
                },
                _ => return Err(BulkUploadError::UnexpectedField(name)),
            }
        }

        Ok(command)
    }

    /// Validates the command parameters
    ///
    /// # Errors
    ///
    /// - `MissingCsv` if no CSV part was supplied
    /// - `TooManyImages` if more than `max_images` images were supplied
    #[tracing::instrument(skip(self), fields(images = self.images.len()))]
    pub fn validate(&self) -> Result<(), BulkUploadError> {
        if self.csv.is_none() {
            return Err(BulkUploadError::MissingCsv);
        }

        if self.images.len() > self.max_images {
            return Err(BulkUploadError::TooManyImages {
                max: self.max_images,
            });
        }

        Ok(())
    }
}

/// Handler function for bulk uploads
///
/// Runs the whole batch and returns the per-row report. Row-level failures are
/// part of a successful response; only a malformed CSV or an unreadable
/// category table fail the request.
#[tracing::instrument(
    skip(orchestrator, command),
    fields(
        csv_bytes = command.csv.as_ref().map(Vec::len).unwrap_or(0),
        images = command.images.len()
    )
)]
pub async fn handle(
    orchestrator: &IngestOrchestrator,
    command: BulkUploadCommand,
) -> Result<BulkUploadResponse, BulkUploadError> {
    command.validate()?;

    let BulkUploadCommand { csv, images, .. } = command;
    let csv = csv.ok_or(BulkUploadError::MissingCsv)?;

    let report = orchestrator.run(&csv, images).await?;

    tracing::info!(
        total_rows = report.total_rows,
        created = report.success_count(),
        failed = report.error_count(),
        "Bulk upload processed"
    );

    Ok(report.into())
}
