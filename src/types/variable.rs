use crate::types::lenient;
use serde::{Deserialize, Serialize};

/// One measured quantity at one station, as listed in `variables.json`.
///
/// The catalog has one entry per (station, quantity) pair, so several entries
/// share the same `id`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Variable {
    /// Identifier of the station this quantity is measured at.
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Field name inside a flat measurement record, or the variable identifier
    /// of a tuple record.
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    /// Human-readable label shown next to the value.
    #[serde(default, deserialize_with = "lenient::text")]
    pub long_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub unit: String,
}

impl Variable {
    /// The label rows are rendered with; falls back to the field name when the
    /// catalog leaves `long_name` blank.
    pub fn label(&self) -> &str {
        if self.long_name.trim().is_empty() {
            &self.name
        } else {
            &self.long_name
        }
    }
}

/// Catalog entries linked to `station_id`, in catalog order.
pub fn variables_for_station<'a>(
    variables: &'a [Variable],
    station_id: &'a str,
) -> impl Iterator<Item = &'a Variable> + 'a {
    variables.iter().filter(move |v| v.id == station_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::latest::resolve_latest;
    use crate::types::measurement::MeasurementRecord;
    use serde_json::json;

    #[test]
    fn numeric_names_match_numeric_tuple_identifiers() {
        let variables: Vec<Variable> = serde_json::from_value(json!([
            {"id": 3, "name": 7, "long_name": "Temperature", "unit": null},
        ]))
        .unwrap();
        assert_eq!(variables[0].id, "3");
        assert_eq!(variables[0].name, "7");
        assert_eq!(variables[0].unit, "");

        let series: Vec<MeasurementRecord> = serde_json::from_value(json!([
            {"ts": "2024-01-01T00:00", "variable_id": 7, "value": 21.5},
        ]))
        .unwrap();
        let latest = resolve_latest("3", &variables, &series);
        assert_eq!(latest.groups[0].rows[0].display_value(), "21.5");
    }

    #[test]
    fn blank_long_name_falls_back_to_name() {
        let variable: Variable = serde_json::from_value(json!({
            "id": "WS1", "name": "rh", "long_name": null, "unit": "%"
        }))
        .unwrap();
        assert_eq!(variable.label(), "rh");
        let filtered: Vec<_> = variables_for_station(std::slice::from_ref(&variable), "WS2").collect();
        assert!(filtered.is_empty());
    }
}
