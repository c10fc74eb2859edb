//! Defines the data structures representing sensor-network stations and their
//! metadata, plus the implementations needed for spatial indexing with `rstar`.

use crate::types::lenient;
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use stationmap::LatLon;
///
/// let sydney = LatLon(-33.8688, 151.2093);
/// assert_eq!(sydney.0, -33.8688); // Latitude
/// assert_eq!(sydney.1, 151.2093); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// A fixed sensor installation, as listed in `weather_stations.json`.
///
/// Coordinates are accepted either as JSON numbers or as numeric strings, since
/// the CSV converter emits every cell as a string.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// The unique station identifier, shared with the variable catalog and the measurement map.
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    /// Display name of the station.
    #[serde(default, deserialize_with = "lenient::text")]
    pub ws_name: String,
    /// Latitude in decimal degrees (positive for North, negative for South).
    #[serde(deserialize_with = "lenient::coordinate")]
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    #[serde(deserialize_with = "lenient::coordinate")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub site: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub portfolio: String,
    /// Administrative region (state) label used by the sidebar filter. `None` when unset.
    #[serde(default, deserialize_with = "lenient::optional_label")]
    pub state: Option<String>,
}

impl Station {
    pub fn location(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }

    /// The region label, if one is set.
    pub fn region(&self) -> Option<&str> {
        self.state.as_deref()
    }

    pub(crate) fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

// --- R-Tree Implementations ---

/// A station is a point, so its envelope is the degenerate box at (latitude, longitude).
impl RTreeObject for Station {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.latitude, self.longitude])
    }
}

impl PointDistance for Station {
    /// Squared Euclidean distance in degree space. Only used to order R-tree
    /// candidates; real distances are computed with haversine afterwards.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.latitude - point[0];
        let dy = self.longitude - point[1];
        dx * dx + dy * dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_converter_output_with_string_cells() {
        let station: Station = serde_json::from_value(json!({
            "id": "WS001",
            "ws_name": "Cowra North",
            "site": "Cowra",
            "portfolio": "Grains",
            "state": "NSW",
            "latitude": "-33.8",
            "longitude": "148.7"
        }))
        .unwrap();
        assert_eq!(station.id, "WS001");
        assert_eq!(station.location(), LatLon(-33.8, 148.7));
        assert_eq!(station.region(), Some("NSW"));
    }

    #[test]
    fn decodes_numeric_fields_and_missing_region() {
        let station: Station = serde_json::from_value(json!({
            "id": 17,
            "ws_name": "Bare",
            "latitude": -12.5,
            "longitude": 130.9,
            "state": ""
        }))
        .unwrap();
        assert_eq!(station.id, "17");
        assert_eq!(station.state, None);
        assert_eq!(station.site, "");
    }

    #[test]
    fn null_text_cells_read_as_empty() {
        let station: Station = serde_json::from_value(json!({
            "id": "WS1",
            "ws_name": "Cowra",
            "site": null,
            "portfolio": "Grains",
            "state": null,
            "latitude": "-33.8",
            "longitude": "148.7"
        }))
        .unwrap();
        assert_eq!(station.site, "");
        assert_eq!(station.portfolio, "Grains");
        assert_eq!(station.region(), None);
    }

    #[test]
    fn rejects_non_numeric_coordinates() {
        let result = serde_json::from_value::<Station>(json!({
            "id": "x",
            "latitude": "north",
            "longitude": "1"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn coordinate_range_check() {
        let mut station: Station = serde_json::from_value(json!({
            "id": "x", "latitude": 10, "longitude": 20
        }))
        .unwrap();
        assert!(station.has_valid_coordinates());
        station.latitude = 91.0;
        assert!(!station.has_valid_coordinates());
        station.latitude = f64::NAN;
        assert!(!station.has_valid_coordinates());
    }
}
