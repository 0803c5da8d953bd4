//! Random-forest model wrapper
//!
//! Wraps smartcore's `RandomForestRegressor` with the metadata and the
//! bincode persistence the prediction service relies on.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;

use super::{evaluate, EvalMetrics, ModelMetadata};
use crate::dataset::{FEATURE_COLUMNS, FEATURE_COUNT};

/// Anything able to predict a water level from the six-feature vector. The
/// service depends on this seam so tests can inject stub models.
pub trait Regressor: Send + Sync {
    fn predict_one(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64>;
}

/// Forest hyperparameters. Configuration, not core logic.
#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: Option<u16>,
    pub min_samples_split: usize,
    pub seed: u64,
}

impl ForestParams {
    fn to_smartcore(self) -> RandomForestRegressorParameters {
        RandomForestRegressorParameters {
            max_depth: self.max_depth,
            min_samples_leaf: 1,
            min_samples_split: self.min_samples_split,
            n_trees: self.n_trees,
            m: None,
            keep_samples: false,
            seed: self.seed,
        }
    }
}

/// The trained model artifact: forest plus metadata, serialized with bincode.
#[derive(Serialize, Deserialize)]
pub struct WaterLevelModel {
    pub metadata: ModelMetadata,
    forest: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
}

impl WaterLevelModel {
    /// Fit a forest on `(x, y)` and evaluate it against the held-out pair.
    pub fn fit(
        x: &[[f64; FEATURE_COUNT]],
        y: &[f64],
        x_eval: &[[f64; FEATURE_COUNT]],
        y_eval: &[f64],
        params: ForestParams,
    ) -> Result<Self> {
        if x.is_empty() {
            anyhow::bail!("cannot train on an empty dataset");
        }
        if x.len() != y.len() {
            anyhow::bail!(
                "feature and target count mismatch: {} features, {} targets",
                x.len(),
                y.len()
            );
        }

        let x_matrix = to_matrix(x);
        let y_vec = y.to_vec();

        let forest = RandomForestRegressor::fit(&x_matrix, &y_vec, params.to_smartcore())
            .map_err(|e| anyhow::anyhow!("random forest training failed: {e:?}"))?;

        let eval_matrix = to_matrix(x_eval);
        let predictions = forest
            .predict(&eval_matrix)
            .map_err(|e| anyhow::anyhow!("prediction failed during evaluation: {e:?}"))?;
        let metrics = evaluate(&predictions, y_eval)?;

        let metadata = ModelMetadata {
            model_id: format!("groundwater_rf_{}", uuid::Uuid::new_v4()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            trained_at: chrono::Utc::now(),
            training_samples: x.len(),
            metrics,
            feature_names: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        };

        Ok(Self { metadata, forest })
    }

    pub fn metrics(&self) -> EvalMetrics {
        self.metadata.metrics
    }

    /// Persist the artifact for the prediction service to load.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = bincode::serialize(self).context("failed to serialize model")?;
        fs::write(path, bytes)
            .with_context(|| format!("failed to write model artifact to {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("failed to read model artifact from {}", path.display()))?;
        bincode::deserialize(&bytes).context("failed to deserialize model artifact")
    }
}

impl Regressor for WaterLevelModel {
    fn predict_one(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64> {
        let x = DenseMatrix::new(1, FEATURE_COUNT, features.to_vec(), false);
        let predictions = self
            .forest
            .predict(&x)
            .map_err(|e| anyhow::anyhow!("prediction failed: {e:?}"))?;
        predictions
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("model returned no prediction"))
    }
}

fn to_matrix(x: &[[f64; FEATURE_COUNT]]) -> DenseMatrix<f64> {
    let mut flat = Vec::with_capacity(x.len() * FEATURE_COUNT);
    for row in x {
        flat.extend_from_slice(row);
    }
    DenseMatrix::new(x.len(), FEATURE_COUNT, flat, false)
}
