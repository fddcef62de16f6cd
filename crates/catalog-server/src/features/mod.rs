//! Feature modules implementing the catalog API
//!
//! Each feature is organized as a vertical slice with its own commands and
//! routes.
//!
//! # Features
//!
//! - **products**: Bulk product import from CSV plus images
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations with validation and a standalone handler
//! - `routes.rs` - HTTP route definitions and error mapping

pub mod products;

use axum::Router;

use crate::ingest::IngestOrchestrator;
use crate::middleware::auth::AdminToken;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    /// Bulk ingestion pipeline wired to the production stores
    pub orchestrator: IngestOrchestrator,
    /// Token guarding admin-only routes
    pub admin_token: AdminToken,
}

/// Creates the main API router with all feature routes mounted
///
/// - `/products` - Product catalog operations
pub fn router(state: FeatureState) -> Router<()> {
    Router::new().nest(
        "/products",
        products::products_routes(state.orchestrator, state.admin_token),
    )
}
