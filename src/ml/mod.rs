//! Water-level regression
//!
//! Offline training pipeline plus the model wrapper the prediction service
//! loads at startup. The regressor is an interchangeable capability behind
//! the [`model::Regressor`] trait; the concrete implementation is a
//! smartcore random forest.

pub mod model;
pub mod report;
pub mod trainer;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// How the trainer fits the forest. Both variants produce the same artifact
/// shape; the choice is configuration, not code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStrategy {
    /// Fit the configured forest once on the training split.
    Plain,
    /// Grow the forest in increments, stopping when the held-out error no
    /// longer improves.
    EarlyStopping,
}

/// Evaluation metrics computed on the held-out split.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub r2: f64,
}

/// Metadata persisted alongside the trained forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_id: String,
    pub version: String,
    pub trained_at: chrono::DateTime<chrono::Utc>,
    pub training_samples: usize,
    pub metrics: EvalMetrics,
    pub feature_names: Vec<String>,
}

/// Compute evaluation metrics for a set of predictions.
pub fn evaluate(predictions: &[f64], targets: &[f64]) -> Result<EvalMetrics> {
    if predictions.len() != targets.len() {
        anyhow::bail!(
            "prediction and target count mismatch: {} predictions, {} targets",
            predictions.len(),
            targets.len()
        );
    }
    if predictions.is_empty() {
        anyhow::bail!("no predictions to evaluate");
    }

    let n = predictions.len() as f64;

    let mse: f64 = predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, t)| (p - t).powi(2))
        .sum::<f64>()
        / n;
    let rmse = mse.sqrt();

    let mean_target: f64 = targets.iter().sum::<f64>() / n;
    let ss_tot: f64 = targets.iter().map(|t| (t - mean_target).powi(2)).sum();
    let ss_res: f64 = predictions
        .iter()
        .zip(targets.iter())
        .map(|(p, t)| (t - p).powi(2))
        .sum();

    let r2 = if ss_tot.abs() < 1e-10 {
        0.0
    } else {
        1.0 - (ss_res / ss_tot)
    };

    Ok(EvalMetrics { mse, rmse, r2 })
}
