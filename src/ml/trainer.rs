//! Training pipeline
//!
//! Loads the combined dataset, extracts features and target, fits the forest
//! on a deterministic seeded split and persists the artifact plus a
//! diagnostic actual-vs-predicted report.

use std::path::PathBuf;

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{info, warn};

use super::model::{ForestParams, Regressor, WaterLevelModel};
use super::{EvalMetrics, TrainingStrategy};
use crate::config::Config;
use crate::dataset::combine::load_combined;
use crate::dataset::extract::features_and_target;
use crate::dataset::FEATURE_COUNT;

#[derive(Debug)]
pub struct TrainingOutcome {
    pub metrics: EvalMetrics,
    pub training_rows: usize,
    pub held_out_rows: usize,
    pub artifact_path: PathBuf,
    pub report_path: Option<PathBuf>,
}

/// Deterministic shuffled split: the same seed over the same dataset always
/// reproduces the same partition.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * test_fraction).round() as usize;
    let n_test = n_test.min(n.saturating_sub(1)).max(usize::from(n > 1));
    let (test, train) = indices.split_at(n_test);
    (train.to_vec(), test.to_vec())
}

fn take(
    x: &[[f64; FEATURE_COUNT]],
    y: &[f64],
    indices: &[usize],
) -> (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) {
    let xs = indices.iter().map(|&i| x[i]).collect();
    let ys = indices.iter().map(|&i| y[i]).collect();
    (xs, ys)
}

/// Run the full training pass described by `cfg`: dataset load, split, fit,
/// evaluation, artifact persistence and diagnostic report.
pub fn train(cfg: &Config) -> Result<TrainingOutcome> {
    let records = load_combined(&cfg.data.combined_path)?;
    let (x, y) = features_and_target(&records);
    info!(
        total_rows = records.len(),
        trainable_rows = x.len(),
        "extracted features and target"
    );

    if x.len() < 2 {
        anyhow::bail!(
            "not enough trainable rows ({}) in the combined dataset",
            x.len()
        );
    }

    let (train_idx, test_idx) = split_indices(x.len(), cfg.training.test_fraction, cfg.training.seed);
    let (x_train, y_train) = take(&x, &y, &train_idx);
    let (x_test, y_test) = take(&x, &y, &test_idx);

    let model = match cfg.training.strategy {
        TrainingStrategy::Plain => fit_plain(cfg, &x_train, &y_train, &x_test, &y_test)?,
        TrainingStrategy::EarlyStopping => {
            fit_early_stopping(cfg, &x_train, &y_train, &x_test, &y_test)?
        }
    };

    let metrics = model.metrics();
    info!(
        mse = metrics.mse,
        rmse = metrics.rmse,
        r2 = metrics.r2,
        "model trained and evaluated on held-out data"
    );

    model.save(&cfg.model.artifact_path)?;
    info!(path = %cfg.model.artifact_path.display(), "model artifact saved");

    // The report is a side artifact; its failure never fails the run.
    let report_path = match render_report(cfg, &model, &x_test, &y_test) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(error = %e, "failed to render model performance report");
            None
        }
    };

    Ok(TrainingOutcome {
        metrics,
        training_rows: x_train.len(),
        held_out_rows: x_test.len(),
        artifact_path: cfg.model.artifact_path.clone(),
        report_path,
    })
}

fn forest_params(cfg: &Config, n_trees: usize) -> ForestParams {
    ForestParams {
        n_trees,
        max_depth: cfg.training.max_depth,
        min_samples_split: cfg.training.min_samples_split,
        seed: cfg.training.seed,
    }
}

fn fit_plain(
    cfg: &Config,
    x_train: &[[f64; FEATURE_COUNT]],
    y_train: &[f64],
    x_test: &[[f64; FEATURE_COUNT]],
    y_test: &[f64],
) -> Result<WaterLevelModel> {
    WaterLevelModel::fit(
        x_train,
        y_train,
        x_test,
        y_test,
        forest_params(cfg, cfg.training.n_trees),
    )
}

/// Grow the forest in `early_stopping_step` increments and keep the size
/// with the lowest held-out MSE, stopping after `early_stopping_rounds`
/// rounds without improvement.
fn fit_early_stopping(
    cfg: &Config,
    x_train: &[[f64; FEATURE_COUNT]],
    y_train: &[f64],
    x_test: &[[f64; FEATURE_COUNT]],
    y_test: &[f64],
) -> Result<WaterLevelModel> {
    let step = cfg.training.early_stopping_step.max(1);
    let patience = cfg.training.early_stopping_rounds.max(1);
    let max_trees = cfg.training.n_trees.max(step);

    let mut best: Option<WaterLevelModel> = None;
    let mut rounds_without_improvement = 0;

    let mut n_trees = step;
    while n_trees <= max_trees {
        let candidate =
            WaterLevelModel::fit(x_train, y_train, x_test, y_test, forest_params(cfg, n_trees))?;
        let mse = candidate.metrics().mse;

        let improved = best
            .as_ref()
            .map(|b| mse < b.metrics().mse)
            .unwrap_or(true);
        if improved {
            info!(n_trees, mse, "held-out error improved");
            best = Some(candidate);
            rounds_without_improvement = 0;
        } else {
            rounds_without_improvement += 1;
            if rounds_without_improvement >= patience {
                info!(n_trees, "early stopping: no improvement for {patience} rounds");
                break;
            }
        }
        n_trees += step;
    }

    best.ok_or_else(|| anyhow::anyhow!("early stopping produced no candidate model"))
}

fn render_report(
    cfg: &Config,
    model: &WaterLevelModel,
    x_test: &[[f64; FEATURE_COUNT]],
    y_test: &[f64],
) -> Result<PathBuf> {
    let predictions: Vec<f64> = x_test
        .iter()
        .map(|row| model.predict_one(row))
        .collect::<Result<_>>()?;
    super::report::render_scatter(y_test, &predictions, &cfg.model.report_path)?;
    Ok(cfg.model.report_path.clone())
}
