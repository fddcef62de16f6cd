//! Product API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/products/bulk-upload` - Import a CSV batch with images (admin only)
//!
//! # Examples
//!
//! ```rust,ignore
//! use axum::Router;
//! use catalog_server::features::products::routes::products_routes;
//!
//! let app = Router::new().nest("/api/v1/products", products_routes(orchestrator, admin_token));
//! ```

use crate::api::response::ErrorResponse;
use crate::ingest::{IngestError, IngestOrchestrator};
use crate::middleware::auth::{require_admin, AdminToken};
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::commands::{BulkUploadCommand, BulkUploadError};

// ============================================================================
// Router Configuration
// ============================================================================

/// Creates the products router
///
/// The bulk upload route is gated by the admin token and accepts bodies up to
/// the configured `max_request_bytes`.
pub fn products_routes(orchestrator: IngestOrchestrator, admin_token: AdminToken) -> Router {
    let body_limit = orchestrator.config().max_request_bytes;

    Router::new()
        .route("/bulk-upload", post(bulk_upload))
        .route_layer(from_fn_with_state(admin_token, require_admin))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(orchestrator)
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Import products from a CSV file and a bundle of images
///
/// # Endpoint
///
/// `POST /api/v1/products/bulk-upload`
///
/// # Request Body
///
/// `multipart/form-data` with one `csvFile` part and any number of `images`
/// parts. A row's `image` column refers to an image part by its filename.
///
/// # Response
///
/// - `200 OK` - Batch processed, see the per-row report
/// - `400 Bad Request` - Missing CSV, malformed CSV or malformed multipart body
/// - `401 Unauthorized` / `403 Forbidden` - Missing or wrong admin token
/// - `413 Payload Too Large` - Body exceeds `max_request_bytes`
/// - `500 Internal Server Error` - Categories could not be loaded
#[tracing::instrument(skip(orchestrator, multipart))]
async fn bulk_upload(
    State(orchestrator): State<IngestOrchestrator>,
    multipart: Multipart,
) -> Result<Response, BulkUploadApiError> {
    let max_images = orchestrator.config().max_images;
    let command = BulkUploadCommand::from_multipart(multipart, max_images).await?;

    let response = super::commands::bulk_upload::handle(&orchestrator, command).await?;

    tracing::info!(
        success_count = response.success_count,
        error_count = response.error_count,
        "Bulk upload completed via API"
    );

    Ok((StatusCode::OK, Json(response)).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for product API operations
#[derive(Debug, thiserror::Error)]
pub enum BulkUploadApiError {
    #[error(transparent)]
    Upload(#[from] BulkUploadError),
}

impl IntoResponse for BulkUploadApiError {
    fn into_response(self) -> Response {
        let BulkUploadApiError::Upload(err) = self;

        match err {
            BulkUploadError::MissingCsv | BulkUploadError::UnexpectedField(_) => {
                let error = ErrorResponse::new("VALIDATION_ERROR", err.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            BulkUploadError::TooManyImages { max } => {
                let error = ErrorResponse::with_details(
                    "VALIDATION_ERROR",
                    err.to_string(),
                    json!({ "maxImages": max }),
                );
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            BulkUploadError::Multipart { status, .. } => {
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "BAD_REQUEST"
                };
                let error = ErrorResponse::new(code, err.to_string());
                (status, Json(error)).into_response()
            },
            BulkUploadError::Ingest(IngestError::Parse(ref parse)) => {
                let error = ErrorResponse::new("PARSE_ERROR", parse.to_string());
                (StatusCode::BAD_REQUEST, Json(error)).into_response()
            },
            BulkUploadError::Ingest(IngestError::CategoryStore(_)) => {
                tracing::error!("Category store error during bulk upload: {}", err);
                let error =
                    ErrorResponse::new("CATEGORY_STORE_ERROR", "Failed to load categories");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
            BulkUploadError::Ingest(IngestError::Worker(_)) => {
                tracing::error!("Worker failure during bulk upload: {}", err);
                let error = ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
            },
        }
    }
}
