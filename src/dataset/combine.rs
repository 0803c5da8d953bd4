//! Dataset combiner
//!
//! Discovers the per-city raw files, runs each through the schema
//! normalizer, tags rows with their city of origin and persists the
//! concatenation. A file that cannot be parsed is skipped with a warning;
//! partial success is the expected steady state.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::normalize::{city_label, normalize_table, SourceTable};
use super::record::CanonicalRecord;
use super::{PipelineError, CANONICAL_COLUMNS};

/// Suffix convention the raw per-city files follow, e.g.
/// `Mumbai_detailed_groundwater_data.csv`.
const SOURCE_NAME_MARKER: &str = "_detailed_groundwater_data";

#[derive(Debug)]
pub struct CombineSummary {
    pub sources_discovered: usize,
    pub sources_combined: usize,
    pub rows: usize,
    pub output: PathBuf,
}

/// List the raw source files under `raw_dir`, sorted by file name so that a
/// re-run over unchanged inputs produces identical output.
pub fn discover_sources(raw_dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut sources = Vec::new();
    for entry in fs::read_dir(raw_dir)? {
        let path = entry?.path();
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        if name.contains(SOURCE_NAME_MARKER) && name.ends_with(".csv") {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

/// Combine every discovered source into one canonical dataset and persist it
/// to `output_path`, overwriting any prior version.
pub fn combine_sources(
    raw_dir: &Path,
    output_path: &Path,
) -> Result<CombineSummary, PipelineError> {
    let sources = discover_sources(raw_dir)?;
    if sources.is_empty() {
        return Err(PipelineError::NoSourcesFound(raw_dir.to_path_buf()));
    }

    let mut combined: Vec<CanonicalRecord> = Vec::new();
    let mut sources_combined = 0;

    for path in &sources {
        match read_source(path) {
            Ok(table) => {
                let city = city_label(path);
                let mut records = normalize_table(&table, &city);
                info!(source = %path.display(), city = %city, rows = records.len(), "normalized source");
                combined.append(&mut records);
                sources_combined += 1;
            }
            Err(e) => {
                warn!(source = %path.display(), error = %e, "skipping unreadable source");
            }
        }
    }

    if sources_combined == 0 {
        return Err(PipelineError::NoUsableSources(sources.len()));
    }

    write_combined(&combined, output_path)?;
    info!(
        cities = sources_combined,
        rows = combined.len(),
        output = %output_path.display(),
        "combined dataset written"
    );

    Ok(CombineSummary {
        sources_discovered: sources.len(),
        sources_combined,
        rows: combined.len(),
        output: output_path.to_path_buf(),
    })
}

fn read_source(path: &Path) -> Result<SourceTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)?;
    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }
    Ok(SourceTable { headers, rows })
}

fn write_combined(records: &[CanonicalRecord], path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Load the persisted combined dataset, checking that every canonical column
/// is present before deserializing rows.
pub fn load_combined(path: &Path) -> Result<Vec<CanonicalRecord>, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::DatasetMissing(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    for column in CANONICAL_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(PipelineError::MissingColumn(column.to_string()));
        }
    }
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}
