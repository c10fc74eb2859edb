use crate::types::station::Station;
use haversine::{distance, Location as HaversineLocation, Units};
use log::warn;
use ordered_float::OrderedFloat;
use rstar::RTree;

/// Spatial index over the loaded stations, used to turn a map coordinate into
/// the nearest station(s).
#[derive(Debug, Clone)]
pub struct StationLocator {
    rtree: RTree<Station>,
}

impl StationLocator {
    /// Builds the index. Stations with unusable coordinates are left out.
    pub fn new(stations: &[Station]) -> Self {
        let indexable: Vec<Station> = stations
            .iter()
            .filter(|station| {
                let ok = station.has_valid_coordinates();
                if !ok {
                    warn!(
                        "Station {} has unusable coordinates ({}, {}); not indexed",
                        station.id, station.latitude, station.longitude
                    );
                }
                ok
            })
            .cloned()
            .collect();
        StationLocator {
            rtree: RTree::bulk_load(indexable),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// Finds up to `n_results` stations within `max_distance_km` of the point,
    /// closest first. With a `region`, only stations in that region are considered.
    pub fn query(
        &self,
        latitude: f64,
        longitude: f64,
        n_results: usize,
        max_distance_km: f64,
        region: Option<&str>,
    ) -> Vec<(&Station, f64)> {
        if n_results == 0 {
            return vec![];
        }

        let in_region = |station: &&Station| region.map_or(true, |r| station.region() == Some(r));
        // R-tree order is degree-space order, which only approximates great-circle
        // order. Without a region the nearest few dozen are enough; with one, every
        // station in the region has to be looked at.
        let candidate_limit = match region {
            None => (n_results * 2).max(20),
            Some(_) => usize::MAX,
        };

        let mut found: Vec<(&Station, f64)> = self
            .rtree
            .nearest_neighbor_iter(&[latitude, longitude])
            .filter(in_region)
            .take(candidate_limit)
            .map(|station| (station, haversine_km(latitude, longitude, station)))
            .filter(|(_, dist_km)| *dist_km <= max_distance_km)
            .collect();

        found.sort_by_key(|(_, dist_km)| OrderedFloat(*dist_km));
        found.truncate(n_results);
        found
    }
}

fn haversine_km(latitude: f64, longitude: f64, station: &Station) -> f64 {
    distance(
        HaversineLocation {
            latitude,
            longitude,
        },
        HaversineLocation {
            latitude: station.latitude,
            longitude: station.longitude,
        },
        Units::Kilometers,
    )
}
