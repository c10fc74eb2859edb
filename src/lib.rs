mod access;
mod convert;
mod error;
mod filtering;
mod resolve;
mod session;
mod stationmap;
mod stations;
mod types;

pub use error::StationMapError;
pub use stationmap::*;

pub use session::{InfoRow, LoadState, Session, StationPopup};

pub use types::dataset::{Dataset, ValidationIssue};
pub use types::measurement::{MeasurementMap, MeasurementRecord, RecordShape, SeriesShape};
pub use types::station::{LatLon, Station};
pub use types::timestamp::parse_instant;
pub use types::variable::{variables_for_station, Variable};

pub use resolve::error::DataQualityIssue;
pub use resolve::latest::{resolve_latest, LatestMeasurements, MeasurementGroup, MeasurementRow};

pub use filtering::StationFilterExt;
pub use stations::locate_station::StationLocator;

pub use access::artifact::Artifact;
pub use access::error::AccessError;
pub use access::file_loader::ArtifactFileLoader;
pub use access::http_loader::ArtifactHttpLoader;
pub use access::server::{router, serve_on};

pub use convert::assemble::{assemble_measurements, AssembleSummary, DEFAULT_STATION_KEY};
pub use convert::csv_to_json::{csv_file_to_json, default_files, ConvertPlan, ConvertSummary};
pub use convert::error::ConvertError;
