//! Prediction endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::dataset::{complete_features, FEATURE_COLUMNS};
use crate::service::AppState;

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: f64,
}

/// POST /predict - point prediction from caller-supplied features.
///
/// Features absent from the request default to the same fill value the
/// schema normalizer uses at training time. A feature that is present but
/// not a number is a client error, never a silent default.
pub async fn predict(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let model = state.model.as_ref().ok_or(ApiError::ModelUnavailable)?;

    let features = body
        .get("features")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            ApiError::BadRequest("invalid input data: `features` key is missing".to_string())
        })?;

    for name in FEATURE_COLUMNS {
        if let Some(value) = features.get(name) {
            if !value.is_number() {
                return Err(ApiError::BadRequest(format!(
                    "feature `{name}` must be a number"
                )));
            }
        }
    }

    let vector = complete_features(|name| features.get(name).and_then(Value::as_f64));
    let prediction = model.predict_one(&vector)?;

    Ok(Json(PredictionResponse { prediction }))
}

/// POST /predict_by_city - prediction from the mean feature values of a
/// city's historical records.
pub async fn predict_by_city(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let model = state.model.as_ref().ok_or(ApiError::ModelUnavailable)?;
    let history = state.history.as_ref().ok_or(ApiError::DataUnavailable)?;

    let city = body
        .get("city")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("`city` parameter is required".to_string()))?;

    let vector = history
        .mean_features(city)
        .ok_or_else(|| ApiError::UnknownCity(city.to_string()))?;
    let prediction = model.predict_one(&vector)?;

    Ok(Json(PredictionResponse { prediction }))
}
