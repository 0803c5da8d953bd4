use anyhow::Result;
use axum::Router;
use groundwater_service::{api, config::Config, service::AppState, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let cfg = Config::load()?;

    info!("attempting to load ML model and historical data");
    let state = AppState::load(cfg.clone());
    if !state.is_ready() {
        warn!(
            model_loaded = state.model.is_some(),
            historical_data_loaded = state.history.is_some(),
            "starting in degraded mode; some endpoints will be unavailable"
        );
    }

    let app: Router = api::router(state, &cfg);
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!(
            "WARNING: Server binding to 0.0.0.0 - service will be accessible from network! \
            For production, bind to 127.0.0.1 unless behind a firewall/reverse proxy."
        );
    }

    info!(%addr, "starting groundwater prediction service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
