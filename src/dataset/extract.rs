//! Feature/target extraction
//!
//! Turns canonical records into the `(X, y)` pair the trainer consumes.
//! This is the one stage where missing data becomes exclusionary: a
//! defaulted-zero feature upstream is valid signal, but a row with an empty
//! cell in any required field is not trainable and is dropped.

use super::record::CanonicalRecord;
use super::FEATURE_COUNT;

/// Extract the six-feature matrix and the water-level target from the
/// combined dataset. Output order matches input order; rows with any missing
/// required value are dropped.
pub fn features_and_target(records: &[CanonicalRecord]) -> (Vec<[f64; FEATURE_COUNT]>, Vec<f64>) {
    let mut x = Vec::with_capacity(records.len());
    let mut y = Vec::with_capacity(records.len());

    for record in records.iter().filter(|r| r.is_complete()) {
        let mut row = [0.0; FEATURE_COUNT];
        for (slot, cell) in row.iter_mut().zip(record.feature_cells()) {
            // is_complete() guarantees every cell is present
            *slot = cell.unwrap_or_default();
        }
        x.push(row);
        y.push(record.water_level_m.unwrap_or_default());
    }

    (x, y)
}
