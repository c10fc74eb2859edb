//! Read-only HTTP endpoints serving the artifacts verbatim.

use crate::access::artifact::Artifact;
use crate::access::error::AccessError;
use crate::access::file_loader::ArtifactFileLoader;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info};
use serde::de::IgnoredAny;
use serde_json::json;
use std::io;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
struct AppState {
    loader: Arc<ArtifactFileLoader>,
}

/// Router with one `GET /api/<artifact>` route per artifact.
pub fn router(data_dir: &Path) -> Router {
    let state = AppState {
        loader: Arc::new(ArtifactFileLoader::new(data_dir)),
    };
    Artifact::ALL
        .into_iter()
        .fold(Router::<AppState>::new(), |router, artifact| {
            router.route(
                &artifact.route(),
                get(move |State(state): State<AppState>| serve_artifact(state, artifact)),
            )
        })
        .with_state(state)
}

/// Serves `data_dir` on an already-bound listener until the task is dropped.
pub async fn serve_on(listener: TcpListener, data_dir: &Path) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Serving {} on http://{}", data_dir.display(), addr);
    }
    axum::serve(listener, router(data_dir)).await
}

async fn serve_artifact(state: AppState, artifact: Artifact) -> Response {
    let bytes = match state.loader.read_raw(artifact).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let status = match &e {
                AccessError::MissingArtifact { source, .. }
                    if source.kind() == io::ErrorKind::NotFound =>
                {
                    StatusCode::NOT_FOUND
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            return error_response(status, &e);
        }
    };

    // Served verbatim, but never serve something the dashboard cannot parse.
    if let Err(source) = serde_json::from_slice::<IgnoredAny>(&bytes) {
        let e = AccessError::MalformedArtifact {
            artifact,
            location: state.loader.path_of(artifact).display().to_string(),
            source,
        };
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e);
    }

    ([(header::CONTENT_TYPE, "application/json")], bytes).into_response()
}

fn error_response(status: StatusCode, e: &AccessError) -> Response {
    error!("{}: {}", status, e);
    (status, Json(json!({ "error": e.to_string() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::file_loader::tests::write_fixture;
    use crate::access::http_loader::ArtifactHttpLoader;
    use std::path::PathBuf;
    use tempfile::TempDir;

    async fn spawn_server(data_dir: PathBuf) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { serve_on(listener, &data_dir).await });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn http_loader_reads_what_the_server_serves() -> Result<(), AccessError> {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let base = spawn_server(dir.path().to_path_buf()).await;

        let dataset = ArtifactHttpLoader::new(&base)?.load().await?;

        assert_eq!(dataset.stations.len(), 2);
        assert_eq!(dataset.latest("WS1").groups[0].timestamp, "2024-01-01T01:00");
        Ok(())
    }

    #[tokio::test]
    async fn bodies_are_returned_verbatim() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let on_disk = std::fs::read_to_string(dir.path().join("variables.json")).unwrap();
        let base = spawn_server(dir.path().to_path_buf()).await;

        let response = reqwest::get(format!("{}/api/variables", base)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers()[reqwest::header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(response.text().await.unwrap(), on_disk);
    }

    #[tokio::test]
    async fn missing_artifact_is_404_with_error_body() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        std::fs::remove_file(dir.path().join("weather_stations.json")).unwrap();
        let base = spawn_server(dir.path().to_path_buf()).await;

        let response = reqwest::get(format!("{}/api/weather_stations", base))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"]
            .as_str()
            .is_some_and(|m| m.contains("weather_stations")));

        let err = ArtifactHttpLoader::new(&base).unwrap().load().await.unwrap_err();
        assert!(matches!(
            err,
            AccessError::HttpStatus { status, .. } if status == reqwest::StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn malformed_artifact_is_500() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        std::fs::write(dir.path().join("all_data.json"), b"{\"WS1\": [").unwrap();
        let base = spawn_server(dir.path().to_path_buf()).await;

        let response = reqwest::get(format!("{}/api/all_data", base)).await.unwrap();
        assert_eq!(
            response.status(),
            reqwest::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path());
        let base = spawn_server(dir.path().to_path_buf()).await;

        let response = reqwest::get(format!("{}/api/nothing", base)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
