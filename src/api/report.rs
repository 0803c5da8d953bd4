//! Model-performance report endpoint

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::service::AppState;

/// GET /model_performance - the persisted diagnostic scatter as a PNG.
/// Purely a side artifact of training; absence is a 404, not a fault.
pub async fn model_performance(State(state): State<AppState>) -> Result<Response, ApiError> {
    let path = &state.cfg.model.report_path;
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], bytes).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ApiError::NotFound(
            "model performance report not found".to_string(),
        )),
        Err(e) => Err(ApiError::Internal(format!(
            "failed to read model performance report: {e}"
        ))),
    }
}
