//! HTTP handlers.
//!
//! Handlers only translate between HTTP and the services; every failure
//! leaves through [`ApiError`](medlab_api::ApiError).

pub mod health;
pub mod patients;

pub use health::{healthz, readyz, root};

use axum::http::HeaderValue;
use medlab_api::ApiError;

/// `Location` header value for a newly created resource.
fn location(path: String) -> Result<HeaderValue, ApiError> {
    HeaderValue::try_from(path)
        .map_err(|e| ApiError::internal(format!("invalid Location header: {e}")))
}
