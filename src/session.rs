//! Dashboard session state: the load outcome plus the two pieces of transient
//! selection state (region and station), and the popup view model built from them.

use crate::error::StationMapError;
use crate::resolve::latest::LatestMeasurements;
use crate::stationmap::StationMap;
use crate::types::station::{LatLon, Station};
use log::{error, info};
use serde::Serialize;
use std::path::Path;

/// Outcome of loading the artifacts for a session.
#[derive(Debug)]
pub enum LoadState {
    Ready(StationMap),
    Failed(StationMapError),
}

/// One label/value line in the station popup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoRow {
    pub label: &'static str,
    pub value: String,
}

/// Everything shown when a station marker is opened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationPopup {
    pub name: String,
    pub info: Vec<InfoRow>,
    pub latest: LatestMeasurements,
}

impl StationPopup {
    fn new(station: &Station, latest: LatestMeasurements) -> Self {
        let info = vec![
            InfoRow {
                label: "ID",
                value: station.id.clone(),
            },
            InfoRow {
                label: "Site",
                value: station.site.clone(),
            },
            InfoRow {
                label: "Portfolio",
                value: station.portfolio.clone(),
            },
            InfoRow {
                label: "State",
                value: station.region().unwrap_or_default().to_string(),
            },
        ];
        StationPopup {
            name: station.ws_name.clone(),
            info,
            latest,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    state: LoadState,
    selected_region: Option<String>,
    selected_station: Option<String>,
}

impl Session {
    /// Starts a session from a load result. Failures are kept, not replaced by
    /// an empty dataset.
    pub fn from_result(result: Result<StationMap, StationMapError>) -> Self {
        let state = match result {
            Ok(map) => {
                info!("Session ready with {} stations", map.stations().len());
                LoadState::Ready(map)
            }
            Err(e) => {
                error!("Failed to load station data: {}", e);
                LoadState::Failed(e)
            }
        };
        Session {
            state,
            selected_region: None,
            selected_station: None,
        }
    }

    pub async fn from_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::from_result(StationMap::from_data_dir(data_dir).await)
    }

    pub async fn from_url(base_url: &str) -> Self {
        Self::from_result(StationMap::from_url(base_url).await)
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The load failure, if the session has no data.
    pub fn error(&self) -> Option<&StationMapError> {
        match &self.state {
            LoadState::Failed(e) => Some(e),
            LoadState::Ready(_) => None,
        }
    }

    pub fn station_map(&self) -> Option<&StationMap> {
        match &self.state {
            LoadState::Ready(map) => Some(map),
            LoadState::Failed(_) => None,
        }
    }

    pub fn regions(&self) -> Vec<String> {
        self.station_map()
            .map(StationMap::regions)
            .unwrap_or_default()
    }

    /// Changes the region filter. The selected station is left as is.
    pub fn select_region(&mut self, region: Option<&str>) {
        self.selected_region = region.map(str::to_string);
    }

    pub fn selected_region(&self) -> Option<&str> {
        self.selected_region.as_deref()
    }

    /// Stations shown on the map under the current region filter.
    pub fn visible_stations(&self) -> Vec<&Station> {
        match self.station_map() {
            Some(map) => map.visible_stations(self.selected_region.as_deref()),
            None => vec![],
        }
    }

    /// Selects a station by id. An unknown id clears the selection and returns `false`.
    pub fn select_station(&mut self, station_id: &str) -> bool {
        let known = self
            .station_map()
            .and_then(|map| map.station(station_id))
            .is_some();
        self.selected_station = known.then(|| station_id.to_string());
        known
    }

    /// Selects the visible station closest to a map click, if one lies within
    /// `max_distance_km`.
    pub fn select_nearest(&mut self, location: LatLon, max_distance_km: f64) -> Option<&Station> {
        let nearest = self.station_map().and_then(|map| {
            map.find_stations()
                .location(location)
                .max_distance_km(max_distance_km)
                .station_limit(1)
                .maybe_region(self.selected_region.as_deref())
                .call()
                .into_iter()
                .next()
        });
        self.selected_station = nearest.map(|(station, _)| station.id);
        self.selected_station()
    }

    pub fn clear_selection(&mut self) {
        self.selected_station = None;
    }

    pub fn selected_station(&self) -> Option<&Station> {
        let id = self.selected_station.as_deref()?;
        self.station_map()?.station(id)
    }

    /// Popup for the selected station, with its latest readings resolved now.
    pub fn popup(&self) -> Option<StationPopup> {
        let station = self.selected_station()?;
        let latest = self.station_map()?.latest(&station.id);
        Some(StationPopup::new(station, latest))
    }
}
