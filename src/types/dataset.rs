//! The three loaded artifacts held together for a session, and the checks run
//! over their data contract.

use crate::resolve::latest::{resolve_latest, LatestMeasurements};
use crate::types::measurement::{MeasurementMap, MeasurementRecord};
use crate::types::station::Station;
use crate::types::variable::Variable;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// Stations, variable catalog and measurement map, loaded once and never mutated.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub stations: Vec<Station>,
    pub variables: Vec<Variable>,
    pub measurements: MeasurementMap,
}

/// A data-contract finding. The converter performs no schema validation, so
/// these are reported rather than rejected.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind")]
pub enum ValidationIssue {
    #[error("Station '{station}' is listed more than once")]
    DuplicateStation { station: String },

    #[error("Station '{station}' has out-of-range coordinates ({latitude}, {longitude})")]
    CoordinateOutOfRange {
        station: String,
        latitude: f64,
        longitude: f64,
    },

    #[error("Variable '{variable}' refers to unknown station '{station}'")]
    DanglingVariable { station: String, variable: String },

    #[error("Variable '{variable}' is catalogued more than once for station '{station}'")]
    DuplicateVariable { station: String, variable: String },

    #[error("Measurements are keyed by unknown station '{station}'")]
    UnknownSeriesStation { station: String },
}

impl Dataset {
    pub fn new(
        stations: Vec<Station>,
        variables: Vec<Variable>,
        measurements: MeasurementMap,
    ) -> Self {
        Self {
            stations,
            variables,
            measurements,
        }
    }

    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// The station's series, or an empty slice when the measurement map has no entry.
    pub fn series(&self, station_id: &str) -> &[MeasurementRecord] {
        self.measurements
            .get(station_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Latest readings of `station_id`. No station lookup is done; unknown ids
    /// simply resolve to nothing.
    pub fn latest(&self, station_id: &str) -> LatestMeasurements {
        resolve_latest(station_id, &self.variables, self.series(station_id))
    }

    /// Checks cross-artifact references and basic station sanity.
    ///
    /// Findings are returned in a stable order: stations, then variables, then
    /// measurement keys sorted by id.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        let mut station_ids = HashSet::with_capacity(self.stations.len());
        for station in &self.stations {
            if !station_ids.insert(station.id.as_str()) {
                issues.push(ValidationIssue::DuplicateStation {
                    station: station.id.clone(),
                });
            }
            if !station.has_valid_coordinates() {
                issues.push(ValidationIssue::CoordinateOutOfRange {
                    station: station.id.clone(),
                    latitude: station.latitude,
                    longitude: station.longitude,
                });
            }
        }

        let mut catalogued = HashSet::with_capacity(self.variables.len());
        for variable in &self.variables {
            if !station_ids.contains(variable.id.as_str()) {
                issues.push(ValidationIssue::DanglingVariable {
                    station: variable.id.clone(),
                    variable: variable.name.clone(),
                });
            }
            if !catalogued.insert((variable.id.as_str(), variable.name.as_str())) {
                issues.push(ValidationIssue::DuplicateVariable {
                    station: variable.id.clone(),
                    variable: variable.name.clone(),
                });
            }
        }

        let mut unknown: Vec<&String> = self
            .measurements
            .keys()
            .filter(|id| !station_ids.contains(id.as_str()))
            .collect();
        unknown.sort();
        issues.extend(
            unknown
                .into_iter()
                .map(|id| ValidationIssue::UnknownSeriesStation {
                    station: id.clone(),
                }),
        );

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset() -> Dataset {
        let stations = serde_json::from_value(json!([
            {"id": "A", "ws_name": "Alpha", "latitude": "-30", "longitude": "150", "state": "NSW"},
            {"id": "B", "ws_name": "Bravo", "latitude": "95", "longitude": "150", "state": "QLD"},
            {"id": "A", "ws_name": "Alpha again", "latitude": "-30", "longitude": "150", "state": "NSW"},
        ]))
        .unwrap();
        let variables = serde_json::from_value(json!([
            {"id": "A", "name": "temp", "long_name": "Temperature", "unit": "C"},
            {"id": "A", "name": "temp", "long_name": "Temperature", "unit": "C"},
            {"id": "Z", "name": "rh", "long_name": "Humidity", "unit": "%"},
        ]))
        .unwrap();
        let measurements = serde_json::from_value(json!({
            "A": [{"timestamp": "2024-01-01T00:00", "temp": "20"}],
            "Y": [],
            "X": [],
        }))
        .unwrap();
        Dataset::new(stations, variables, measurements)
    }

    #[test]
    fn validate_reports_every_contract_breach_in_order() {
        let issues = dataset().validate();
        assert_eq!(
            issues,
            vec![
                ValidationIssue::CoordinateOutOfRange {
                    station: "B".to_string(),
                    latitude: 95.0,
                    longitude: 150.0
                },
                ValidationIssue::DuplicateStation {
                    station: "A".to_string()
                },
                ValidationIssue::DuplicateVariable {
                    station: "A".to_string(),
                    variable: "temp".to_string()
                },
                ValidationIssue::DanglingVariable {
                    station: "Z".to_string(),
                    variable: "rh".to_string()
                },
                ValidationIssue::UnknownSeriesStation {
                    station: "X".to_string()
                },
                ValidationIssue::UnknownSeriesStation {
                    station: "Y".to_string()
                },
            ]
        );
    }

    #[test]
    fn findings_serialize_with_their_kind() {
        let value = serde_json::to_value(dataset().validate()).unwrap();
        assert_eq!(value[1], json!({"kind": "DuplicateStation", "station": "A"}));
        assert_eq!(value[4]["kind"], "UnknownSeriesStation");
    }

    #[test]
    fn clean_dataset_has_no_findings() {
        let mut data = dataset();
        data.stations.truncate(1);
        data.variables.truncate(1);
        data.measurements.retain(|k, _| k == "A");
        assert!(data.validate().is_empty());
    }

    #[test]
    fn series_and_latest_for_unknown_station_are_empty() {
        let data = dataset();
        assert!(data.series("nope").is_empty());
        assert!(data.latest("nope").is_empty());
        assert_eq!(data.series("A").len(), 1);
    }

    #[test]
    fn latest_resolves_from_loaded_sets() {
        let data = dataset();
        let latest = data.latest("A");
        // Duplicate catalog entries still each produce a row.
        assert_eq!(latest.groups[0].rows.len(), 2);
        assert_eq!(latest.groups[0].rows[0].display_value(), "20 C");
    }
}
