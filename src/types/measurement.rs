//! Measurement records and series as found in `all_data.json`.
//!
//! Two record layouts exist in the wild. Converted CSV exports produce *flat*
//! records, one object per observation time with one key per variable:
//!
//! ```json
//! {"timestamp": "2024-01-02T00:00", "air_temp": "21.4", "rh": "40"}
//! ```
//!
//! Long-format exports produce *tuple* records, one object per variable and time:
//!
//! ```json
//! {"ts": "2024-01-02T00:00", "var_id": "air_temp", "value": 21.4}
//! ```
//!
//! The layout is decided once per record while decoding, so the resolver only
//! ever matches on [`MeasurementRecord`].

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;

const TIMESTAMP_KEYS: &[&str] = &["timestamp", "ts"];
const VARIABLE_KEYS: &[&str] = &["var_id", "variable_id"];
const VALUE_KEY: &str = "value";

/// Station id -> that station's arrival-ordered series.
pub type MeasurementMap = HashMap<String, Vec<MeasurementRecord>>;

/// A single observation event for one station.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub enum MeasurementRecord {
    /// Every variable observed at `timestamp`, keyed by the variable's field name.
    Flat {
        timestamp: String,
        fields: Map<String, Value>,
    },
    /// One variable's value observed at `timestamp`.
    Tuple {
        timestamp: String,
        variable: String,
        value: Value,
    },
}

/// The layout of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordShape {
    Flat,
    Tuple,
}

impl fmt::Display for RecordShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordShape::Flat => write!(f, "flat"),
            RecordShape::Tuple => write!(f, "tuple"),
        }
    }
}

/// The layout of a whole series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesShape {
    Empty,
    Uniform(RecordShape),
    Mixed { flat: usize, tuple: usize },
}

impl SeriesShape {
    /// Classifies `series` by counting the shapes of its records.
    pub fn of(series: &[MeasurementRecord]) -> Self {
        let tuple = series
            .iter()
            .filter(|r| r.shape() == RecordShape::Tuple)
            .count();
        let flat = series.len() - tuple;
        match (flat, tuple) {
            (0, 0) => SeriesShape::Empty,
            (_, 0) => SeriesShape::Uniform(RecordShape::Flat),
            (0, _) => SeriesShape::Uniform(RecordShape::Tuple),
            (flat, tuple) => SeriesShape::Mixed { flat, tuple },
        }
    }

    /// The shape that drives resolution. Mixed series resolve their majority
    /// shape; an even split resolves the tuple records.
    pub fn dominant(&self) -> Option<RecordShape> {
        match *self {
            SeriesShape::Empty => None,
            SeriesShape::Uniform(shape) => Some(shape),
            SeriesShape::Mixed { flat, tuple } if flat > tuple => Some(RecordShape::Flat),
            SeriesShape::Mixed { .. } => Some(RecordShape::Tuple),
        }
    }
}

impl MeasurementRecord {
    pub fn shape(&self) -> RecordShape {
        match self {
            MeasurementRecord::Flat { .. } => RecordShape::Flat,
            MeasurementRecord::Tuple { .. } => RecordShape::Tuple,
        }
    }

    /// The timestamp exactly as it appeared in the artifact. Empty when absent.
    pub fn raw_timestamp(&self) -> &str {
        match self {
            MeasurementRecord::Flat { timestamp, .. } => timestamp,
            MeasurementRecord::Tuple { timestamp, .. } => timestamp,
        }
    }
}

impl From<Map<String, Value>> for MeasurementRecord {
    fn from(mut object: Map<String, Value>) -> Self {
        let timestamp = TIMESTAMP_KEYS
            .iter()
            .find_map(|key| object.remove(*key))
            .map(scalar_text)
            .unwrap_or_default();

        let variable_key = VARIABLE_KEYS.iter().copied().find(|key| {
            matches!(object.get(*key), Some(Value::String(_) | Value::Number(_)))
        });

        match variable_key {
            Some(key) if object.contains_key(VALUE_KEY) => {
                let variable = object.remove(key).map(scalar_text).unwrap_or_default();
                let value = object.remove(VALUE_KEY).unwrap_or(Value::Null);
                MeasurementRecord::Tuple {
                    timestamp,
                    variable,
                    value,
                }
            }
            _ => MeasurementRecord::Flat {
                timestamp,
                fields: object,
            },
        }
    }
}

/// Renders a scalar JSON value as plain text: strings without quotes, null as empty.
pub(crate) fn scalar_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
