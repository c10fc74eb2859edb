use serde::Serialize;
use thiserror::Error;

/// A per-record data-quality problem met while resolving a station.
///
/// These are collected alongside the result instead of being returned as `Err`:
/// one bad record never aborts resolution for the rest of the station.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind")]
pub enum DataQualityIssue {
    #[error("Record {index} of station '{station}' has malformed timestamp '{raw}'")]
    MalformedTimestamp {
        station: String,
        index: usize,
        raw: String,
    },

    #[error("Station '{station}' mixes {flat} flat and {tuple} tuple records")]
    MixedRecordShape {
        station: String,
        flat: usize,
        tuple: usize,
    },
}
