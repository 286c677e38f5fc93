//! Liveness and readiness probes.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State};
use serde::Serialize;

/// Probe response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the probe passes.
    pub status: &'static str,
}

/// Liveness: the process is up and serving.
///
/// # Endpoint
///
/// `GET /health`
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Readiness: a round-trip on a pooled database connection.
///
/// # Endpoint
///
/// `GET /health/ready`
pub async fn readiness(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    staybook_postgres::ping(&state.pool)
        .await
        .map_err(|e| AppError::unavailable("Database unavailable").with_source(e.into()))?;

    Ok(Json(HealthResponse { status: "ok" }))
}
