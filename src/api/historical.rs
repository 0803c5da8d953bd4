//! Historical lookup endpoint

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::service::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoricalQuery {
    pub city: Option<String>,
}

/// One historical observation. The date is null-capable at serialization
/// time so a non-representable date degrades to `null` instead of failing
/// the whole response.
#[derive(Debug, Serialize)]
pub struct HistoricalPoint {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Water_Level_m")]
    pub water_level_m: f64,
}

/// GET /historical_data?city=<name> - ordered (Date, Water_Level_m) pairs
/// for a city, case-insensitive match. Records whose date failed to parse
/// were already dropped at load time and never appear here.
pub async fn historical_data(
    State(state): State<AppState>,
    Query(query): Query<HistoricalQuery>,
) -> Result<Json<Vec<HistoricalPoint>>, ApiError> {
    let history = state.history.as_ref().ok_or(ApiError::DataUnavailable)?;

    let city = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("`city` parameter is required".to_string()))?;

    let records = history.for_city(city);
    if records.is_empty() {
        return Err(ApiError::UnknownCity(city.to_string()));
    }

    let points = records
        .iter()
        .filter_map(|r| {
            // A record without a measurement carries nothing to list.
            r.water_level_m.map(|level| HistoricalPoint {
                date: Some(r.date.format("%Y-%m-%d").to_string()),
                water_level_m: level,
            })
        })
        .collect();

    Ok(Json(points))
}
