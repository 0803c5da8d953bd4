//! Service startup state
//!
//! The model and the historical dataset are loaded once at startup and held
//! as immutable handles for the process lifetime. Each load may fail
//! independently; the service then runs degraded and reports per-resource
//! unavailability instead of refusing to boot.

pub mod history;

use std::sync::Arc;

use tracing::{error, info};

use crate::config::Config;
use crate::ml::model::{Regressor, WaterLevelModel};
use history::HistoricalData;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub model: Option<Arc<dyn Regressor>>,
    pub history: Option<Arc<HistoricalData>>,
}

impl AppState {
    /// Attempt to load both resources. Neither failure is fatal; the
    /// handlers fail per-resource instead.
    pub fn load(cfg: Config) -> Self {
        let model: Option<Arc<dyn Regressor>> = match WaterLevelModel::load(&cfg.model.artifact_path)
        {
            Ok(model) => {
                info!(
                    model_id = %model.metadata.model_id,
                    trained_at = %model.metadata.trained_at,
                    "machine learning model loaded"
                );
                Some(Arc::new(model))
            }
            Err(e) => {
                error!(path = %cfg.model.artifact_path.display(), error = %e, "failed to load model");
                None
            }
        };

        let history = match HistoricalData::load(&cfg.data.combined_path) {
            Ok(history) => {
                info!(records = history.len(), "historical data loaded");
                Some(Arc::new(history))
            }
            Err(e) => {
                error!(path = %cfg.data.combined_path.display(), error = %e, "failed to load historical data");
                None
            }
        };

        Self { cfg, model, history }
    }

    /// Build a state from pre-constructed resources (test seam).
    pub fn with_resources(
        cfg: Config,
        model: Option<Arc<dyn Regressor>>,
        history: Option<Arc<HistoricalData>>,
    ) -> Self {
        Self { cfg, model, history }
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some() && self.history.is_some()
    }
}
