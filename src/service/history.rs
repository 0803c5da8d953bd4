//! In-memory historical dataset
//!
//! The prediction service's read-only view of the combined dataset. Dates
//! are parsed exactly once, at load time; a record whose date cannot be
//! parsed is dropped entirely and never reappears in any lookup.

use std::path::Path;

use chrono::NaiveDate;
use tracing::warn;

use crate::dataset::combine::load_combined;
use crate::dataset::{PipelineError, DEFAULT_FILL, FEATURE_COUNT};

#[derive(Debug, Clone)]
pub struct HistoryRecord {
    pub date: NaiveDate,
    pub city: String,
    pub water_level_m: Option<f64>,
    pub features: [Option<f64>; FEATURE_COUNT],
}

/// All date-valid canonical records, in dataset order.
#[derive(Debug, Default)]
pub struct HistoricalData {
    records: Vec<HistoryRecord>,
}

impl HistoricalData {
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let canonical = load_combined(path)?;
        let total = canonical.len();
        let records: Vec<HistoryRecord> = canonical
            .into_iter()
            .filter_map(|r| {
                let date = parse_date(&r.date)?;
                Some(HistoryRecord {
                    date,
                    city: r.city.clone(),
                    water_level_m: r.water_level_m,
                    features: r.feature_cells(),
                })
            })
            .collect();
        if records.len() < total {
            warn!(
                dropped = total - records.len(),
                kept = records.len(),
                "dropped records with unparseable dates"
            );
        }
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<HistoryRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records for a city, matched by case-insensitive exact equality, in
    /// dataset order.
    pub fn for_city(&self, city: &str) -> Vec<&HistoryRecord> {
        self.records
            .iter()
            .filter(|r| r.city.eq_ignore_ascii_case(city))
            .collect()
    }

    /// Per-feature arithmetic mean across the city's records, skipping
    /// missing cells; a feature with no values at all falls back to the
    /// default fill. `None` when the city has no records.
    pub fn mean_features(&self, city: &str) -> Option<[f64; FEATURE_COUNT]> {
        let records = self.for_city(city);
        if records.is_empty() {
            return None;
        }

        let mut means = [DEFAULT_FILL; FEATURE_COUNT];
        for (i, mean) in means.iter_mut().enumerate() {
            let values: Vec<f64> = records.iter().filter_map(|r| r.features[i]).collect();
            if !values.is_empty() {
                *mean = values.iter().sum::<f64>() / values.len() as f64;
            }
        }
        Some(means)
    }
}

/// Parse a date cell, accepting the common formats seen in the raw files
/// and rejecting everything else.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    const FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}
