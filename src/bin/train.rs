//! Training pipeline entry point: combine the per-city raw files, fit the
//! regressor and persist the model artifact plus the diagnostic report.

use anyhow::Result;
use groundwater_service::{config::Config, dataset::combine, ml::trainer, telemetry};
use tracing::info;

fn main() -> Result<()> {
    telemetry::init_tracing();

    let cfg = Config::load()?;

    let summary = combine::combine_sources(&cfg.data.raw_dir, &cfg.data.combined_path)?;
    info!(
        cities = summary.sources_combined,
        rows = summary.rows,
        output = %summary.output.display(),
        "data combination complete"
    );

    info!("starting model training");
    let outcome = trainer::train(&cfg)?;
    info!(
        mse = outcome.metrics.mse,
        rmse = outcome.metrics.rmse,
        r2 = outcome.metrics.r2,
        training_rows = outcome.training_rows,
        held_out_rows = outcome.held_out_rows,
        artifact = %outcome.artifact_path.display(),
        "training complete"
    );
    if let Some(report) = outcome.report_path {
        info!(report = %report.display(), "model performance report written");
    }

    Ok(())
}
