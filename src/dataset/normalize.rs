//! Schema normalizer
//!
//! Maps an arbitrary per-city source table onto the canonical record schema.
//! Missing columns are filled with the default value rather than rejected;
//! source columns outside the canonical set are dropped.

use std::path::Path;

use super::record::CanonicalRecord;
use super::{DEFAULT_FILL, FEATURE_COLUMNS, TARGET_COLUMN};

/// A raw source table as read from one city's CSV file. Read-only input; the
/// normalizer never mutates it.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SourceTable {
    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Derive the city label from a source file name: the leading token of the
/// file stem before its first `_` (e.g. `Mumbai_detailed_groundwater_data.csv`
/// -> `Mumbai`).
pub fn city_label(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    stem.split('_').next().unwrap_or_default().to_string()
}

/// Normalize one source table into canonical records tagged with `city`.
///
/// Column handling:
/// - `WL` is an accepted alias for the water-level column; an explicit
///   `Water_Level_m` column wins if both are present.
/// - A canonical column absent from the source is filled with the default
///   value for every row. Missing data is not an error at this stage.
/// - Cells that are empty or fail to parse as numbers stay empty; the
///   feature extractor decides later whether the row is trainable.
pub fn normalize_table(table: &SourceTable, city: &str) -> Vec<CanonicalRecord> {
    let date_idx = table.column("Date");
    let target_idx = table.column(TARGET_COLUMN).or_else(|| table.column("WL"));
    let feature_idx: Vec<Option<usize>> = FEATURE_COLUMNS
        .iter()
        .map(|name| table.column(name))
        .collect();

    table
        .rows
        .iter()
        .map(|row| {
            let features: Vec<Option<f64>> = feature_idx
                .iter()
                .map(|idx| numeric_cell(row, *idx))
                .collect();
            CanonicalRecord {
                date: text_cell(row, date_idx),
                city: city.to_string(),
                water_level_m: numeric_cell(row, target_idx),
                lat: features[0],
                long: features[1],
                rainfall_mm: features[2],
                temperature_c: features[3],
                ph: features[4],
                dissolved_oxygen_mg_l: features[5],
            }
        })
        .collect()
}

fn text_cell(row: &[String], idx: Option<usize>) -> String {
    idx.and_then(|i| row.get(i))
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// A cell from a column the source actually has parses to a value or stays
/// empty; a column the source lacks is defaulted.
fn numeric_cell(row: &[String], idx: Option<usize>) -> Option<f64> {
    match idx {
        Some(i) => row.get(i).and_then(|s| s.trim().parse::<f64>().ok()),
        None => Some(DEFAULT_FILL),
    }
}
