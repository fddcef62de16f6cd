//! Admin bearer-token gate
//!
//! Admin-only routes require `Authorization: Bearer <CATALOG_ADMIN_TOKEN>`.
//! A missing or malformed header yields `401 Unauthorized`, a wrong token
//! `403 Forbidden`.
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! let admin = AdminToken::new(config.auth.admin_token.clone());
//! let routes = Router::new()
//!     .route("/bulk-upload", post(bulk_upload))
//!     .route_layer(from_fn_with_state(admin, require_admin));
//! ```

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sha2::{Digest, Sha256};
use std::sync::Arc;

use crate::api::response::ErrorResponse;

/// The configured admin token, shared with the middleware as state
#[derive(Clone)]
pub struct AdminToken(Arc<str>);

impl AdminToken {
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(Arc::from(token.as_ref()))
    }

    /// Constant-time comparison of the SHA-256 digests
    fn matches(&self, candidate: &str) -> bool {
        if self.0.is_empty() {
            return false;
        }

        let expected = Sha256::digest(self.0.as_bytes());
        let presented = Sha256::digest(candidate.as_bytes());

        expected
            .iter()
            .zip(presented.iter())
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminToken(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingCredentials,
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthRejection::MissingCredentials => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Not authorized, no token",
            ),
            AuthRejection::InvalidToken => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Not authorized as an admin",
            ),
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

/// Middleware that requires the admin bearer token
pub async fn require_admin(
    State(token): State<AdminToken>,
    req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthRejection::MissingCredentials)?;

    if !token.matches(presented) {
        tracing::warn!(path = %req.uri().path(), "Rejected admin request with invalid token");
        return Err(AuthRejection::InvalidToken);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware::from_fn_with_state, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/admin", get(|| async { "ok" }))
            .route_layer(from_fn_with_state(AdminToken::new("s3cret"), require_admin))
    }

    async fn status_for(auth: Option<&str>) -> StatusCode {
        let mut builder = axum::http::Request::builder().uri("/admin");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        assert_eq!(status_for(None).await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(Some("Basic abc")).await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(Some("Bearer ")).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_token_is_forbidden() {
        assert_eq!(status_for(Some("Bearer nope")).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        assert_eq!(status_for(Some("Bearer s3cret")).await, StatusCode::OK);
    }

    #[test]
    fn test_token_matching() {
        let token = AdminToken::new("s3cret");
        assert!(token.matches("s3cret"));
        assert!(!token.matches("s3cre"));
        assert!(!token.matches("s3cret "));
        assert!(!token.matches("S3CRET"));
        assert!(!token.matches(""));
    }

    #[test]
    fn test_empty_configured_token_never_matches() {
        assert!(!AdminToken::new("").matches(""));
    }
}
