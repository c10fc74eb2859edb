use crate::types::station::Station;
use std::collections::BTreeSet;

pub trait StationFilterExt {
    /// Distinct region labels, sorted by their natural string order.
    ///
    /// Labels are compared case-sensitively; stations without a region do not
    /// contribute a label.
    fn regions(&self) -> Vec<String>;

    /// Stations visible under the sidebar filter.
    ///
    /// # Arguments
    /// * `region`: `None` shows every station; `Some(label)` shows the stations
    ///   whose region equals `label` exactly.
    ///
    /// # Returns
    /// The matching stations in their original order. An empty result is valid.
    fn filter_by_region(&self, region: Option<&str>) -> Vec<&Station>;
}

impl StationFilterExt for [Station] {
    fn regions(&self) -> Vec<String> {
        self.iter()
            .filter_map(Station::region)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn filter_by_region(&self, region: Option<&str>) -> Vec<&Station> {
        match region {
            None => self.iter().collect(),
            Some(label) => self.iter().filter(|s| s.region() == Some(label)).collect(),
        }
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    fn stations() -> Vec<Station> {
        serde_json::from_value(json!([
            {"id": "1", "latitude": 0, "longitude": 0, "state": "VIC"},
            {"id": "2", "latitude": 0, "longitude": 0, "state": "NSW"},
            {"id": "3", "latitude": 0, "longitude": 0, "state": "vic"},
            {"id": "4", "latitude": 0, "longitude": 0},
            {"id": "5", "latitude": 0, "longitude": 0, "state": "NSW"},
        ]))
        .unwrap()
    }

    #[test]
    fn regions_are_sorted_distinct_and_case_sensitive() {
        assert_eq!(stations().regions(), vec!["NSW", "VIC", "vic"]);
    }

    #[test]
    fn no_selection_shows_everything() {
        let all = stations();
        assert_eq!(all.filter_by_region(None).len(), all.len());
    }

    #[test]
    fn selection_matches_exactly() {
        let all = stations();
        let ids: Vec<_> = all
            .filter_by_region(Some("NSW"))
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "5"]);
        assert!(all.filter_by_region(Some("nsw")).is_empty());
        assert!(all.filter_by_region(Some("TAS")).is_empty());
    }

    #[test]
    fn regions_plus_unset_partition_the_station_set() {
        let all = stations();
        let mut seen = HashSet::new();
        for region in all.regions() {
            for station in all.filter_by_region(Some(&region)) {
                assert!(seen.insert(station.id.clone()), "duplicate {}", station.id);
            }
        }
        for station in all.iter().filter(|s| s.region().is_none()) {
            assert!(seen.insert(station.id.clone()));
        }
        assert_eq!(seen.len(), all.len());
    }

    #[test]
    fn empty_station_set() {
        let none: Vec<Station> = Vec::new();
        assert!(none.regions().is_empty());
        assert!(none.filter_by_region(Some("NSW")).is_empty());
    }
}
