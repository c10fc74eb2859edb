use crate::access::artifact::Artifact;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Artifact '{artifact}' could not be read from '{path}'")]
    MissingArtifact {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // `location` is a file path or a URL depending on the loader.
    #[error("Artifact '{artifact}' at '{location}' is not valid JSON for its schema")]
    MalformedArtifact {
        artifact: Artifact,
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}
