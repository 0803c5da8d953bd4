//! Health / readiness endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use crate::service::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub historical_data_loaded: bool,
}

/// GET /healthz - reports per-resource availability. The process serves in
/// a degraded state when one or both resources failed to load.
pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: if state.is_ready() { "ready" } else { "degraded" },
        model_loaded: state.model.is_some(),
        historical_data_loaded: state.history.is_some(),
    })
}
