//! HTTP surface tests: the router is driven directly with injected stub
//! resources, no network involved.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use groundwater_service::api;
use groundwater_service::config::{Config, DataConfig, ModelConfig, ServerConfig, TrainingConfig};
use groundwater_service::dataset::FEATURE_COUNT;
use groundwater_service::ml::model::Regressor;
use groundwater_service::ml::TrainingStrategy;
use groundwater_service::service::history::{parse_date, HistoricalData, HistoryRecord};
use groundwater_service::service::AppState;

/// Stub model that echoes the first feature (Lat); lets tests observe the
/// exact feature vector the service fed into the model.
struct EchoLat;

impl Regressor for EchoLat {
    fn predict_one(&self, features: &[f64; FEATURE_COUNT]) -> anyhow::Result<f64> {
        Ok(features[0])
    }
}

/// Stub model that sums all six features.
struct SumModel;

impl Regressor for SumModel {
    fn predict_one(&self, features: &[f64; FEATURE_COUNT]) -> anyhow::Result<f64> {
        Ok(features.iter().sum())
    }
}

fn test_config(root: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            enable_cors: true,
            request_timeout_secs: 5,
        },
        data: DataConfig {
            raw_dir: root.join("raw"),
            combined_path: root.join("combined_city_data.csv"),
        },
        model: ModelConfig {
            artifact_path: root.join("model.bin"),
            report_path: root.join("model_performance.png"),
        },
        training: TrainingConfig {
            strategy: TrainingStrategy::Plain,
            test_fraction: 0.2,
            seed: 42,
            n_trees: 10,
            max_depth: Some(4),
            min_samples_split: 2,
            early_stopping_step: 5,
            early_stopping_rounds: 2,
        },
    }
}

fn record(city: &str, date: &str, lat: f64, water_level: f64) -> HistoryRecord {
    HistoryRecord {
        date: parse_date(date).unwrap(),
        city: city.to_string(),
        water_level_m: Some(water_level),
        features: [
            Some(lat),
            Some(20.0),
            Some(5.0),
            Some(28.0),
            Some(7.0),
            Some(5.0),
        ],
    }
}

fn sample_history() -> HistoricalData {
    HistoricalData::from_records(vec![
        record("Mumbai", "2023-01-01", 10.0, 4.0),
        record("Mumbai", "2023-01-02", 12.0, 4.2),
        record("Pune", "2023-02-01", 18.5, 3.1),
    ])
}

fn app(
    root: &Path,
    model: Option<Arc<dyn Regressor>>,
    history: Option<Arc<HistoricalData>>,
) -> axum::Router {
    let cfg = test_config(root);
    let state = AppState::with_resources(cfg.clone(), model, history);
    api::router(state, &cfg)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn predict_defaults_missing_features_to_zero() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), Some(Arc::new(SumModel)), None);

    // Only Lat supplied: every other feature must default to 0.0, so the
    // sum-stub returns exactly the Lat value.
    let response = app
        .oneshot(post_json("/predict", json!({ "features": { "Lat": 12.97 } })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!((body["prediction"].as_f64().unwrap() - 12.97).abs() < 1e-9);
}

#[tokio::test]
async fn predict_missing_features_key_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), Some(Arc::new(SumModel)), None);

    let response = app
        .oneshot(post_json("/predict", json!({ "Lat": 12.97 })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("features"));
}

#[tokio::test]
async fn predict_non_numeric_feature_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), Some(Arc::new(SumModel)), None);

    let response = app
        .oneshot(post_json(
            "/predict",
            json!({ "features": { "Lat": "twelve" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Lat"));
}

#[tokio::test]
async fn predict_without_model_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), None, Some(Arc::new(sample_history())));

    let response = app
        .oneshot(post_json("/predict", json!({ "features": { "Lat": 1.0 } })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("model"));
}

#[tokio::test]
async fn predict_by_city_feeds_mean_features_to_model() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(
        dir.path(),
        Some(Arc::new(EchoLat)),
        Some(Arc::new(sample_history())),
    );

    // Mumbai has Lat 10.0 and 12.0; the echo-stub must see their mean.
    let response = app
        .oneshot(post_json("/predict_by_city", json!({ "city": "Mumbai" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!((body["prediction"].as_f64().unwrap() - 11.0).abs() < 1e-9);
}

#[tokio::test]
async fn predict_by_city_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(
        dir.path(),
        Some(Arc::new(EchoLat)),
        Some(Arc::new(sample_history())),
    );

    let response = app
        .oneshot(post_json("/predict_by_city", json!({ "city": "mUMBAI" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn predict_by_city_unknown_city_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(
        dir.path(),
        Some(Arc::new(EchoLat)),
        Some(Arc::new(sample_history())),
    );

    let response = app
        .oneshot(post_json("/predict_by_city", json!({ "city": "Atlantis" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("Atlantis"));
}

#[tokio::test]
async fn predict_by_city_missing_city_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(
        dir.path(),
        Some(Arc::new(EchoLat)),
        Some(Arc::new(sample_history())),
    );

    let response = app
        .oneshot(post_json("/predict_by_city", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn predict_by_city_without_history_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), Some(Arc::new(EchoLat)), None);

    let response = app
        .oneshot(post_json("/predict_by_city", json!({ "city": "Mumbai" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("historical data"));
}

#[tokio::test]
async fn historical_data_returns_ordered_pairs() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), None, Some(Arc::new(sample_history())));

    let response = app
        .oneshot(get("/historical_data?city=mumbai"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["Date"], "2023-01-01");
    assert_eq!(points[0]["Water_Level_m"], 4.0);
    assert_eq!(points[1]["Date"], "2023-01-02");
}

#[tokio::test]
async fn historical_data_unknown_city_is_not_found_not_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), None, Some(Arc::new(sample_history())));

    let response = app
        .oneshot(get("/historical_data?city=Atlantis"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn historical_data_missing_city_param_is_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), None, Some(Arc::new(sample_history())));

    let response = app.oneshot(get("/historical_data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn historical_data_without_history_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), Some(Arc::new(EchoLat)), None);

    let response = app
        .oneshot(get("/historical_data?city=Mumbai"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn historical_data_excludes_unparseable_dates_from_load() {
    let dir = tempfile::tempdir().unwrap();
    let combined = dir.path().join("combined_city_data.csv");
    std::fs::write(
        &combined,
        "Date,City,Water_Level_m,Lat,Long,Rainfall_mm,Temperature_C,pH,Dissolved_Oxygen_mg_L\n\
         2023-01-01,Mumbai,4.0,19.0,72.0,5.0,28.0,7.0,5.0\n\
         garbage,Mumbai,9.9,19.0,72.0,5.0,28.0,7.0,5.0\n\
         2023-01-02,Mumbai,4.2,19.0,72.0,5.0,28.0,7.0,5.0\n",
    )
    .unwrap();
    let history = HistoricalData::load(&combined).unwrap();
    let app = app(dir.path(), None, Some(Arc::new(history)));

    let response = app
        .oneshot(get("/historical_data?city=Mumbai"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let points = body.as_array().unwrap();
    // The bad-date record is gone entirely, not listed with a null date.
    assert_eq!(points.len(), 2);
    assert!(points.iter().all(|p| !p["Date"].is_null()));
}

#[tokio::test]
async fn model_performance_missing_report_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path(), None, None);

    let response = app.oneshot(get("/model_performance")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn model_performance_serves_png_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("model_performance.png");
    std::fs::write(&report, b"\x89PNG\r\n\x1a\nfake").unwrap();
    let app = app(dir.path(), None, None);

    let response = app.oneshot(get("/model_performance")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}

#[tokio::test]
async fn healthz_reports_degraded_and_ready() {
    let dir = tempfile::tempdir().unwrap();

    let degraded = app(dir.path(), Some(Arc::new(EchoLat)), None);
    let response = degraded.oneshot(get("/healthz")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["historical_data_loaded"], false);

    let ready = app(
        dir.path(),
        Some(Arc::new(EchoLat)),
        Some(Arc::new(sample_history())),
    );
    let response = ready.oneshot(get("/healthz")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "ready");
}
