use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error taxonomy. Every failure maps to a structured, human-readable
/// message identifying the resource or field at fault.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("no data found for city `{0}`")]
    UnknownCity(String),

    #[error("{0}")]
    NotFound(String),

    #[error("machine learning model is not loaded on the server")]
    ModelUnavailable,

    #[error("historical data is not loaded on the server")]
    DataUnavailable,

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownCity(_) | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ModelUnavailable | ApiError::DataUnavailable | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            ApiError::Internal(_) => tracing::error!(error = %self, "request failed"),
            ApiError::ModelUnavailable | ApiError::DataUnavailable => {
                tracing::warn!(error = %self, "resource unavailable")
            }
            _ => tracing::debug!(error = %self, "client error"),
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::Internal(error.to_string())
    }
}
