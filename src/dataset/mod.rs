//! Canonical dataset pipeline
//!
//! Per-city raw CSV files are normalized into one fixed schema, concatenated
//! and persisted for the trainer and the prediction service to share.

pub mod combine;
pub mod extract;
pub mod normalize;
pub mod record;

use std::path::PathBuf;
use thiserror::Error;

/// The six environmental features the model predicts from, in the order the
/// model expects them.
pub const FEATURE_COLUMNS: [&str; 6] = [
    "Lat",
    "Long",
    "Rainfall_mm",
    "Temperature_C",
    "pH",
    "Dissolved_Oxygen_mg_L",
];

pub const FEATURE_COUNT: usize = FEATURE_COLUMNS.len();

/// Full canonical column order of the combined dataset.
pub const CANONICAL_COLUMNS: [&str; 9] = [
    "Date",
    "City",
    "Water_Level_m",
    "Lat",
    "Long",
    "Rainfall_mm",
    "Temperature_C",
    "pH",
    "Dissolved_Oxygen_mg_L",
];

pub const TARGET_COLUMN: &str = "Water_Level_m";

/// Value substituted for a feature that a source or a request did not supply.
pub const DEFAULT_FILL: f64 = 0.0;

/// Build a complete feature vector from a partial source of feature values.
///
/// This is the single missing-data repair policy shared by the schema
/// normalizer (training time) and the prediction endpoint (serving time);
/// keeping one call site for both avoids train/serve skew.
pub fn complete_features<F>(lookup: F) -> [f64; FEATURE_COUNT]
where
    F: Fn(&str) -> Option<f64>,
{
    let mut out = [DEFAULT_FILL; FEATURE_COUNT];
    for (slot, name) in out.iter_mut().zip(FEATURE_COLUMNS.iter()) {
        if let Some(value) = lookup(name) {
            *slot = value;
        }
    }
    out
}

/// Failures of the dataset pipeline that callers must tell apart.
///
/// A single unreadable source file is never represented here: it is logged
/// and skipped inside the combiner, and the pipeline continues.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no groundwater source files found under {}", .0.display())]
    NoSourcesFound(PathBuf),

    #[error("none of the {0} discovered source files could be parsed")]
    NoUsableSources(usize),

    #[error("combined dataset not found at {}; run the `train` binary first", .0.display())]
    DatasetMissing(PathBuf),

    #[error("required column `{0}` is missing from the combined dataset")]
    MissingColumn(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
