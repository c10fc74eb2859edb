//! Resolution of a station's latest readings.
//!
//! Flat series take the last valid record in arrival order and read every
//! variable from it. Tuple series take, for each variable, the record with the
//! greatest instant. Timestamps are always parsed before comparison.

use crate::resolve::error::DataQualityIssue;
use crate::types::measurement::{MeasurementRecord, RecordShape, SeriesShape};
use crate::types::timestamp::parse_instant;
use crate::types::variable::{variables_for_station, Variable};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// A single labelled reading, e.g. `Temperature: 12 C`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRow {
    pub label: String,
    /// Reading as text; `None` when the record had no value for this variable.
    pub value: Option<String>,
    pub unit: String,
}

impl MeasurementRow {
    /// `"<value> <unit>"`, just the value when the unit is blank, and an empty
    /// string when there is no value at all.
    pub fn display_value(&self) -> String {
        match self.value.as_deref() {
            Some(v) if !v.is_empty() => {
                if self.unit.is_empty() {
                    v.to_string()
                } else {
                    format!("{} {}", v, self.unit)
                }
            }
            _ => String::new(),
        }
    }
}

/// Rows that share one observation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementGroup {
    /// The timestamp exactly as it appeared in the artifact.
    pub timestamp: String,
    pub observed_at: DateTime<Utc>,
    pub rows: Vec<MeasurementRow>,
}

/// The outcome of [`resolve_latest`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LatestMeasurements {
    pub groups: Vec<MeasurementGroup>,
    pub issues: Vec<DataQualityIssue>,
}

impl LatestMeasurements {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All rows across groups, in order.
    pub fn rows(&self) -> impl Iterator<Item = &MeasurementRow> {
        self.groups.iter().flat_map(|g| g.rows.iter())
    }
}

struct Candidate<'a> {
    record: &'a MeasurementRecord,
    observed_at: DateTime<Utc>,
}

/// Computes the most recent value of every catalogued variable of `station_id`.
///
/// * `variables` is the full catalog; only entries whose `id` equals
///   `station_id` are used, in catalog order.
/// * `series` is the station's arrival-ordered series. Its record shape decides
///   the algorithm (see the module docs).
///
/// Records with unparseable timestamps are reported as
/// [`DataQualityIssue::MalformedTimestamp`] and left out of the comparison.
/// A series mixing both shapes is reported as
/// [`DataQualityIssue::MixedRecordShape`] and its majority shape is resolved.
///
/// # Examples
///
/// ```
/// use stationmap::{resolve_latest, MeasurementRecord, Variable};
/// use serde_json::json;
///
/// let variables = vec![Variable {
///     id: "WS1".into(),
///     name: "temp".into(),
///     long_name: "Temperature".into(),
///     unit: "C".into(),
/// }];
/// let series: Vec<MeasurementRecord> = serde_json::from_value(json!([
///     {"ts": "2024-01-01T00:00", "var_id": "temp", "value": 10},
///     {"ts": "2024-01-02T00:00", "var_id": "temp", "value": 12},
/// ]))
/// .unwrap();
///
/// let latest = resolve_latest("WS1", &variables, &series);
/// assert_eq!(latest.groups.len(), 1);
/// assert_eq!(latest.groups[0].timestamp, "2024-01-02T00:00");
/// assert_eq!(latest.groups[0].rows[0].display_value(), "12 C");
/// ```
pub fn resolve_latest(
    station_id: &str,
    variables: &[Variable],
    series: &[MeasurementRecord],
) -> LatestMeasurements {
    let catalog: Vec<&Variable> = variables_for_station(variables, station_id).collect();
    if catalog.is_empty() || series.is_empty() {
        debug!(
            "Nothing to resolve for station {} ({} variables, {} records)",
            station_id,
            catalog.len(),
            series.len()
        );
        return LatestMeasurements::default();
    }

    let mut issues = Vec::new();
    let shape = SeriesShape::of(series);
    if let SeriesShape::Mixed { flat, tuple } = shape {
        warn!(
            "Station {} mixes {} flat and {} tuple records",
            station_id, flat, tuple
        );
        issues.push(DataQualityIssue::MixedRecordShape {
            station: station_id.to_string(),
            flat,
            tuple,
        });
    }
    let Some(dominant) = shape.dominant() else {
        return LatestMeasurements::default();
    };

    let mut candidates = Vec::with_capacity(series.len());
    for (index, record) in series.iter().enumerate() {
        if record.shape() != dominant {
            continue;
        }
        match parse_instant(record.raw_timestamp()) {
            Some(observed_at) => candidates.push(Candidate {
                record,
                observed_at,
            }),
            None => {
                warn!(
                    "Skipping record {} of station {}: malformed timestamp '{}'",
                    index,
                    station_id,
                    record.raw_timestamp()
                );
                issues.push(DataQualityIssue::MalformedTimestamp {
                    station: station_id.to_string(),
                    index,
                    raw: record.raw_timestamp().to_string(),
                });
            }
        }
    }

    let groups = match dominant {
        RecordShape::Flat => resolve_flat(&catalog, &candidates),
        RecordShape::Tuple => resolve_tuples(&catalog, &candidates),
    };
    LatestMeasurements { groups, issues }
}

fn resolve_flat(catalog: &[&Variable], candidates: &[Candidate<'_>]) -> Vec<MeasurementGroup> {
    // Series are arrival-ordered, so the last valid record is the latest one.
    let Some(latest) = candidates.last() else {
        return Vec::new();
    };
    let MeasurementRecord::Flat { timestamp, fields } = latest.record else {
        return Vec::new();
    };
    let rows = catalog
        .iter()
        .map(|variable| row(variable, field_text(fields, &variable.name)))
        .collect();
    vec![MeasurementGroup {
        timestamp: timestamp.clone(),
        observed_at: latest.observed_at,
        rows,
    }]
}

fn resolve_tuples(catalog: &[&Variable], candidates: &[Candidate<'_>]) -> Vec<MeasurementGroup> {
    let mut latest: HashMap<&str, &Candidate<'_>> = HashMap::new();
    for candidate in candidates {
        let MeasurementRecord::Tuple { variable, .. } = candidate.record else {
            continue;
        };
        latest
            .entry(variable.as_str())
            .and_modify(|best| {
                // Strictly greater: on an exact tie the first record seen stays.
                if candidate.observed_at > best.observed_at {
                    *best = candidate;
                }
            })
            .or_insert(candidate);
    }

    catalog
        .iter()
        .filter_map(|variable| {
            let candidate = latest.get(variable.name.as_str())?;
            let MeasurementRecord::Tuple {
                timestamp, value, ..
            } = candidate.record
            else {
                return None;
            };
            Some(MeasurementGroup {
                timestamp: timestamp.clone(),
                observed_at: candidate.observed_at,
                rows: vec![row(variable, value_text(value))],
            })
        })
        .collect()
}

fn row(variable: &Variable, value: Option<String>) -> MeasurementRow {
    MeasurementRow {
        label: variable.label().to_string(),
        value,
        unit: variable.unit.clone(),
    }
}

fn field_text(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(value_text)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
