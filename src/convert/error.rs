use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read CSV '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Failed to encode JSON for '{path}'")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("I/O error on '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse measurement array '{path}'")]
    MeasurementParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode measurement map for '{path}'")]
    MeasurementEncode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
