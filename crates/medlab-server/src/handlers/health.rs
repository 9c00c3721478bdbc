use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use medlab_api::ApiError;
use serde::Serialize;
use serde_json::json;

use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "MedLab Server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

/// Ready once the storage backend answers.
pub async fn readyz(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.storage.ping().await.map_err(|e| {
        tracing::warn!(error = %e, backend = state.storage.backend_name(), "readiness check failed");
        ApiError::service_unavailable("storage unavailable")
    })?;
    Ok((StatusCode::OK, Json(HealthResponse { status: "ready" })))
}
