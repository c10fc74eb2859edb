use crate::access::artifact::Artifact;
use crate::access::error::AccessError;
use crate::types::dataset::Dataset;
use crate::types::measurement::MeasurementMap;
use crate::types::station::Station;
use crate::types::variable::Variable;
use futures_util::future::try_join3;
use log::{info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Fetches the three artifacts from a running data-access server.
#[derive(Debug, Clone)]
pub struct ArtifactHttpLoader {
    base_url: String,
    download_client: Client,
}

impl ArtifactHttpLoader {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: &str) -> Result<ArtifactHttpLoader, AccessError> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AccessError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(ArtifactHttpLoader {
            base_url: base_url.to_string(),
            download_client: Client::new(),
        })
    }

    pub fn url_of(&self, artifact: Artifact) -> String {
        format!("{}{}", self.base_url, artifact.route())
    }

    /// Fetches and decodes one artifact.
    pub async fn fetch<T: DeserializeOwned>(&self, artifact: Artifact) -> Result<T, AccessError> {
        let url = self.url_of(artifact);
        info!("Fetching {} from {}", artifact, url);

        let response = self
            .download_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AccessError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    AccessError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    AccessError::NetworkRequest(url, e)
                });
            }
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AccessError::NetworkRequest(url.clone(), e))?;
        serde_json::from_slice(&bytes).map_err(|source| AccessError::MalformedArtifact {
            artifact,
            location: url,
            source,
        })
    }

    /// Fetches all three artifacts concurrently. Any single failure fails the load.
    pub async fn load(&self) -> Result<Dataset, AccessError> {
        let (stations, variables, measurements) = try_join3(
            self.fetch::<Vec<Station>>(Artifact::Stations),
            self.fetch::<Vec<Variable>>(Artifact::Variables),
            self.fetch::<MeasurementMap>(Artifact::Measurements),
        )
        .await?;
        info!(
            "Fetched {} stations, {} variables and {} series from {}",
            stations.len(),
            variables.len(),
            measurements.len(),
            self.base_url
        );
        Ok(Dataset::new(stations, variables, measurements))
    }
}
