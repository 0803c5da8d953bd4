pub mod error;
pub mod health;
pub mod historical;
pub mod predict;
pub mod report;

use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::Config, service::AppState};

pub fn router(state: AppState, cfg: &Config) -> Router {
    let mut router = Router::new()
        .route("/predict", post(predict::predict))
        .route("/predict_by_city", post(predict::predict_by_city))
        .route("/historical_data", get(historical::historical_data))
        .route("/model_performance", get(report::model_performance))
        .route("/healthz", get(health::healthz))
        .with_state(state);

    if cfg.server.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    cfg.server.request_timeout_secs,
                ))),
        )
        .layer(TraceLayer::new_for_http())
}
