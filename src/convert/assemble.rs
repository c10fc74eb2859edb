//! Builds the station-keyed measurement map (`all_data.json`) from the
//! per-export measurement arrays the CSV conversion produces.

use crate::convert::error::ConvertError;
use log::{info, warn};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Column holding the station identifier in converted measurement exports.
pub const DEFAULT_STATION_KEY: &str = "id";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssembleSummary {
    pub stations: usize,
    pub records: usize,
    /// Records without a usable station key.
    pub skipped: usize,
}

/// Groups the records of every file in `inputs` by their `station_key` column and
/// writes the result to `output`.
///
/// Records keep their input order within a station (files in the order given,
/// rows in file order), which is the arrival order resolution relies on.
pub fn assemble_measurements(
    inputs: &[PathBuf],
    station_key: &str,
    output: &Path,
) -> Result<AssembleSummary, ConvertError> {
    let mut grouped: BTreeMap<String, Vec<Map<String, Value>>> = BTreeMap::new();
    let mut summary = AssembleSummary::default();

    for input in inputs {
        let bytes = std::fs::read(input).map_err(|e| ConvertError::Io {
            path: input.clone(),
            source: e,
        })?;
        let records: Vec<Map<String, Value>> =
            serde_json::from_slice(&bytes).map_err(|e| ConvertError::MeasurementParse {
                path: input.clone(),
                source: e,
            })?;

        for record in records {
            let station = match record.get(station_key) {
                Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => {
                    summary.skipped += 1;
                    continue;
                }
            };
            grouped.entry(station).or_default().push(record);
            summary.records += 1;
        }
    }
    if summary.skipped > 0 {
        warn!(
            "Skipped {} records without a '{}' column",
            summary.skipped, station_key
        );
    }
    summary.stations = grouped.len();

    let dir = output.parent().unwrap_or_else(|| Path::new("."));
    let temp_file = NamedTempFile::new_in(dir).map_err(|e| ConvertError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(temp_file);
    serde_json::to_writer_pretty(&mut writer, &grouped).map_err(|e| {
        ConvertError::MeasurementEncode {
            path: output.to_path_buf(),
            source: e,
        }
    })?;
    writer.flush().map_err(|e| ConvertError::Io {
        path: output.to_path_buf(),
        source: e,
    })?;
    let temp_file = writer.into_inner().map_err(|e| ConvertError::Io {
        path: output.to_path_buf(),
        source: e.into_error(),
    })?;
    temp_file.persist(output).map_err(|e| ConvertError::Io {
        path: output.to_path_buf(),
        source: e.error,
    })?;

    info!(
        "Assembled {} records for {} stations into {}",
        summary.records,
        summary.stations,
        output.display()
    );
    Ok(summary)
}
