//! The three JSON artifacts the dashboard is built from.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// `weather_stations.json`: array of station records.
    Stations,
    /// `variables.json`: array of variable catalog entries.
    Variables,
    /// `all_data.json`: station id -> measurement series.
    Measurements,
}

impl Artifact {
    pub const ALL: [Artifact; 3] = [
        Artifact::Stations,
        Artifact::Variables,
        Artifact::Measurements,
    ];

    /// Basename shared by the file on disk and the HTTP endpoint.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Artifact::Stations => "weather_stations",
            Artifact::Variables => "variables",
            Artifact::Measurements => "all_data",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.path_segment())
    }

    /// Route the artifact is served under, e.g. `/api/variables`.
    pub fn route(&self) -> String {
        format!("/api/{}", self.path_segment())
    }
}

/// Formats an `Artifact` using its `path_segment`.
///
/// # Examples
///
/// ```
/// use stationmap::Artifact;
///
/// assert_eq!(Artifact::Measurements.to_string(), "all_data");
/// assert_eq!(Artifact::Stations.file_name(), "weather_stations.json");
/// assert_eq!(Artifact::Variables.route(), "/api/variables");
/// ```
impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}
