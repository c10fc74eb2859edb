use crate::access::artifact::Artifact;
use crate::access::error::AccessError;
use crate::types::dataset::Dataset;
use crate::types::measurement::MeasurementMap;
use crate::types::station::Station;
use crate::types::variable::Variable;
use log::info;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Reads the three artifacts from a data directory.
#[derive(Debug, Clone)]
pub struct ArtifactFileLoader {
    data_dir: PathBuf,
}

impl ArtifactFileLoader {
    pub fn new(data_dir: &Path) -> ArtifactFileLoader {
        ArtifactFileLoader {
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_of(&self, artifact: Artifact) -> PathBuf {
        self.data_dir.join(artifact.file_name())
    }

    /// Raw bytes of one artifact, unparsed.
    pub async fn read_raw(&self, artifact: Artifact) -> Result<Vec<u8>, AccessError> {
        let path = self.path_of(artifact);
        fs::read(&path)
            .await
            .map_err(|source| AccessError::MissingArtifact {
                artifact,
                path,
                source,
            })
    }

    /// Reads and decodes one artifact.
    pub async fn read<T: DeserializeOwned>(&self, artifact: Artifact) -> Result<T, AccessError> {
        let bytes = self.read_raw(artifact).await?;
        serde_json::from_slice(&bytes).map_err(|source| AccessError::MalformedArtifact {
            artifact,
            location: self.path_of(artifact).display().to_string(),
            source,
        })
    }

    /// Loads all three artifacts concurrently. Any single failure fails the load.
    pub async fn load(&self) -> Result<Dataset, AccessError> {
        let (stations, variables, measurements) = tokio::try_join!(
            self.read::<Vec<Station>>(Artifact::Stations),
            self.read::<Vec<Variable>>(Artifact::Variables),
            self.read::<MeasurementMap>(Artifact::Measurements),
        )?;
        let dataset = Dataset::new(stations, variables, measurements);
        info!(
            "Loaded {} stations, {} variables and {} series from {}",
            dataset.stations.len(),
            dataset.variables.len(),
            dataset.measurements.len(),
            self.data_dir.display()
        );
        Ok(dataset)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    /// Writes a small but complete data directory.
    pub(crate) fn write_fixture(dir: &Path) {
        let stations = json!([
            {"id": "WS1", "ws_name": "Cowra", "site": "Cowra", "portfolio": "Grains",
             "state": "NSW", "latitude": "-33.83", "longitude": "148.69"},
            {"id": "WS2", "ws_name": "Horsham", "site": "Horsham", "portfolio": "Grains",
             "state": "VIC", "latitude": "-36.71", "longitude": "142.20"},
        ]);
        let variables = json!([
            {"id": "WS1", "name": "temp", "long_name": "Temperature", "unit": "C"},
            {"id": "WS1", "name": "rh", "long_name": "Relative Humidity", "unit": "%"},
            {"id": "WS2", "name": "temp", "long_name": "Temperature", "unit": "C"},
        ]);
        let measurements = json!({
            "WS1": [
                {"timestamp": "2024-01-01T00:00", "temp": "20.1", "rh": "55"},
                {"timestamp": "2024-01-01T01:00", "temp": "19.4", "rh": "58"},
            ],
            "WS2": [
                {"ts": "2024-01-01T00:00", "var_id": "temp", "value": 10},
                {"ts": "2024-01-02T00:00", "var_id": "temp", "value": 12},
            ],
        });
        for (artifact, value) in [
            (Artifact::Stations, stations),
            (Artifact::Variables, variables),
            (Artifact::Measurements, measurements),
        ] {
            std::fs::write(
                dir.join(artifact.file_name()),
                serde_json::to_vec_pretty(&value).unwrap(),
            )
            .unwrap();
        }
    }

    #[tokio::test]
    async fn loads_all_three_artifacts() -> Result<(), AccessError> {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());

        let dataset = ArtifactFileLoader::new(dir.path()).load().await?;

        assert_eq!(dataset.stations.len(), 2);
        assert_eq!(dataset.variables.len(), 3);
        assert_eq!(dataset.series("WS1").len(), 2);
        assert_eq!(
            dataset.latest("WS2").groups[0].rows[0].display_value(),
            "12 C"
        );
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_reported_with_its_path() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        std::fs::remove_file(dir.path().join("variables.json")).unwrap();

        let err = ArtifactFileLoader::new(dir.path()).load().await.unwrap_err();
        match err {
            AccessError::MissingArtifact { artifact, path, .. } => {
                assert_eq!(artifact, Artifact::Variables);
                assert!(path.ends_with("variables.json"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        std::fs::write(dir.path().join("all_data.json"), b"{not json").unwrap();

        let err = ArtifactFileLoader::new(dir.path()).load().await.unwrap_err();
        assert!(matches!(
            err,
            AccessError::MalformedArtifact {
                artifact: Artifact::Measurements,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn wrong_schema_is_malformed() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        // A bare array where a station-keyed object is expected.
        std::fs::write(dir.path().join("all_data.json"), b"[]").unwrap();

        let err = ArtifactFileLoader::new(dir.path()).load().await.unwrap_err();
        assert!(matches!(err, AccessError::MalformedArtifact { .. }));
    }
}
