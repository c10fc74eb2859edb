//! This module provides the main entry point of the crate. A [`StationMap`] holds
//! one loaded dataset and answers everything the dashboard asks of it: which
//! regions exist, which stations are visible, which station is nearest a map
//! coordinate, and what a station's latest readings are.

use crate::access::file_loader::ArtifactFileLoader;
use crate::access::http_loader::ArtifactHttpLoader;
use crate::error::StationMapError;
use crate::filtering::StationFilterExt;
use crate::resolve::latest::LatestMeasurements;
use crate::stations::locate_station::StationLocator;
use crate::types::dataset::{Dataset, ValidationIssue};
use crate::types::station::{LatLon, Station};
use bon::bon;
use log::warn;
use std::path::Path;

/// Default search radius for [`StationMap::find_stations`], in kilometres.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;
/// Default number of stations returned by [`StationMap::find_stations`].
pub const DEFAULT_STATION_LIMIT: usize = 5;

/// An immutable, fully loaded station dataset plus its spatial index.
///
/// Create one with [`StationMap::from_data_dir()`] to read the artifacts from
/// disk, [`StationMap::from_url()`] to fetch them from a running server, or
/// [`StationMap::from_dataset()`] when the data is already in memory.
///
/// # Examples
///
/// ```no_run
/// # use stationmap::{StationMap, StationMapError};
/// # async fn run() -> Result<(), StationMapError> {
/// let map = StationMap::from_data_dir("data").await?;
/// for region in map.regions() {
///     println!("{}: {} stations", region, map.visible_stations(Some(&region)).len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StationMap {
    dataset: Dataset,
    station_locator: StationLocator,
}

#[bon]
impl StationMap {
    /// Wraps an in-memory dataset. Data-contract findings are logged, not rejected.
    pub fn from_dataset(dataset: Dataset) -> Self {
        for issue in dataset.validate() {
            warn!("{}", issue);
        }
        let station_locator = StationLocator::new(&dataset.stations);
        Self {
            dataset,
            station_locator,
        }
    }

    /// Loads `weather_stations.json`, `variables.json` and `all_data.json` from
    /// `data_dir`, concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`StationMapError::Access`] if any artifact is missing or not
    /// valid JSON for its schema. No partial dataset is ever produced.
    pub async fn from_data_dir(data_dir: impl AsRef<Path>) -> Result<Self, StationMapError> {
        let dataset = ArtifactFileLoader::new(data_dir.as_ref()).load().await?;
        Ok(Self::from_dataset(dataset))
    }

    /// Fetches the three artifacts from a server started with
    /// [`crate::serve_on`] (or anything exposing the same routes).
    ///
    /// # Errors
    ///
    /// Returns [`StationMapError::Access`] on network failures, non-2xx
    /// statuses, or unparseable bodies.
    pub async fn from_url(base_url: &str) -> Result<Self, StationMapError> {
        let dataset = ArtifactHttpLoader::new(base_url)?.load().await?;
        Ok(Self::from_dataset(dataset))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn stations(&self) -> &[Station] {
        &self.dataset.stations
    }

    pub fn station(&self, id: &str) -> Option<&Station> {
        self.dataset.station(id)
    }

    /// Sorted distinct region labels, for the sidebar.
    pub fn regions(&self) -> Vec<String> {
        self.dataset.stations.regions()
    }

    /// Stations shown on the map for the given region selection.
    pub fn visible_stations(&self, region: Option<&str>) -> Vec<&Station> {
        self.dataset.stations.filter_by_region(region)
    }

    /// Latest readings of `station_id`. Unknown stations resolve to nothing.
    pub fn latest(&self, station_id: &str) -> LatestMeasurements {
        self.dataset.latest(station_id)
    }

    /// Data-contract findings for the loaded artifacts.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        self.dataset.validate()
    }

    /// Finds stations near a map coordinate, closest first.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.location(LatLon)`: **Required.** The coordinate to search around.
    /// * `.max_distance_km(f64)`: Optional. Search radius. Defaults to [`DEFAULT_MAX_DISTANCE_KM`].
    /// * `.station_limit(usize)`: Optional. Maximum number of stations. Defaults to [`DEFAULT_STATION_LIMIT`].
    /// * `.region(&str)`: Optional. Only consider stations in this region.
    ///
    /// # Returns
    ///
    /// `(station, distance_km)` pairs, possibly empty.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use stationmap::{StationMap, LatLon, StationMapError};
    /// # async fn run() -> Result<(), StationMapError> {
    /// let map = StationMap::from_data_dir("data").await?;
    /// let nearby = map
    ///     .find_stations()
    ///     .location(LatLon(-33.87, 151.21))
    ///     .max_distance_km(25.0)
    ///     .region("NSW")
    ///     .call();
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn find_stations(
        &self,
        location: LatLon,
        max_distance_km: Option<f64>,
        station_limit: Option<usize>,
        region: Option<&str>,
    ) -> Vec<(Station, f64)> {
        let max_distance_km = max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM);
        let station_limit = station_limit.unwrap_or(DEFAULT_STATION_LIMIT);

        self.station_locator
            .query(location.0, location.1, station_limit, max_distance_km, region)
            .into_iter()
            .map(|(station, distance_km)| (station.clone(), distance_km))
            .collect()
    }
}
