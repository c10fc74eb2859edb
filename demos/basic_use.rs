//! Serves a data directory, loads it back over HTTP and prints the popup of
//! the first station in each region.
//!
//! `cargo run --example basic_use -- <data-dir>` (defaults to `data`).

use stationmap::{serve_on, Session};
use std::env;
use std::path::PathBuf;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=info to see what the loader and server are doing
    env_logger::init();

    let data_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}", listener.local_addr()?);
    let server_dir = data_dir.clone();
    tokio::spawn(async move { serve_on(listener, &server_dir).await });

    let mut session = Session::from_url(&base_url).await;
    if let Some(e) = session.error() {
        eprintln!("Could not load {}: {}", data_dir.display(), e);
        return Ok(());
    }

    for region in session.regions() {
        session.select_region(Some(&region));
        let first_id = session.visible_stations().first().map(|s| s.id.clone());
        let Some(first_id) = first_id else { continue };
        session.select_station(&first_id);

        let Some(popup) = session.popup() else { continue };
        println!("--- {} ({}) ---", popup.name, region);
        for row in &popup.info {
            println!("{}: {}", row.label, row.value);
        }
        for group in &popup.latest.groups {
            println!("Latest Measurements ({})", group.timestamp);
            for row in &group.rows {
                println!("  {}: {}", row.label, row.display_value());
            }
        }
    }
    Ok(())
}
