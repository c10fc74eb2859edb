use crate::access::error::AccessError;
use crate::convert::error::ConvertError;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationMapError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Failed to serve on {0}")]
    Serve(SocketAddr, #[source] std::io::Error),

    #[error("Unknown station '{0}'")]
    UnknownStation(String),

    #[error("Failed to encode output")]
    Encode(#[from] serde_json::Error),
}
