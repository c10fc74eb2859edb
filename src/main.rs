use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;
use stationmap::{
    assemble_measurements, default_files, serve_on, ConvertPlan, StationMap, StationMapError,
    DEFAULT_STATION_KEY,
};
use std::error::Error;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "stationmap")]
#[command(about = "Serve station data, convert CSV exports, and inspect latest readings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where a command reads the three artifacts from.
#[derive(Args)]
struct Source {
    /// Directory holding weather_stations.json, variables.json and all_data.json
    #[arg(long, env = "STATIONMAP_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Base URL of a running `stationmap serve`. Takes precedence over --data-dir
    #[arg(long, env = "STATIONMAP_URL")]
    url: Option<String>,
}

impl Source {
    async fn load(&self) -> Result<StationMap, StationMapError> {
        match &self.url {
            Some(url) => StationMap::from_url(url).await,
            None => StationMap::from_data_dir(&self.data_dir).await,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the artifacts under /api/weather_stations, /api/variables and /api/all_data
    Serve {
        #[arg(long, env = "STATIONMAP_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,

        #[arg(long, env = "STATIONMAP_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Convert CSV exports into JSON arrays
    Convert {
        #[arg(long, default_value = "scripts")]
        input_dir: PathBuf,

        #[arg(long, env = "STATIONMAP_DATA_DIR", default_value = "data")]
        output_dir: PathBuf,

        /// CSV file to convert (repeatable). Defaults to the standard export list
        #[arg(long = "file")]
        files: Vec<String>,
    },
    /// Group converted measurement arrays by station into all_data.json
    Assemble {
        #[arg(long, default_value = "data/all_data.json")]
        output: PathBuf,

        #[arg(long, default_value = DEFAULT_STATION_KEY)]
        station_key: String,

        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print the latest readings of a station
    Latest {
        #[command(flatten)]
        source: Source,

        station: String,
    },
    /// Print the distinct region labels
    Regions {
        #[command(flatten)]
        source: Source,
    },
    /// Check the artifacts' data contract
    Validate {
        #[command(flatten)]
        source: Source,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<ExitCode, StationMapError> {
    match command {
        Commands::Serve { data_dir, bind } => {
            let listener = TcpListener::bind(bind)
                .await
                .map_err(|e| StationMapError::Serve(bind, e))?;
            serve_on(listener, &data_dir)
                .await
                .map_err(|e| StationMapError::Serve(bind, e))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Convert {
            input_dir,
            output_dir,
            files,
        } => {
            let files = if files.is_empty() {
                default_files()
            } else {
                files
            };
            let plan = ConvertPlan::builder()
                .input_dir(input_dir)
                .output_dir(output_dir)
                .files(files)
                .build();
            let summary = plan.run().await?;
            info!(
                "Converted {} of {} files",
                summary.converted.len(),
                plan.files.len()
            );
            Ok(if summary.is_complete() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Commands::Assemble {
            output,
            station_key,
            inputs,
        } => {
            let summary = assemble_measurements(&inputs, &station_key, &output)?;
            println!(
                "{} records for {} stations written to {} ({} skipped)",
                summary.records,
                summary.stations,
                output.display(),
                summary.skipped
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Latest { source, station } => {
            let map = source.load().await?;
            if map.station(&station).is_none() {
                return Err(StationMapError::UnknownStation(station));
            }
            let latest = map.latest(&station);
            for issue in &latest.issues {
                warn!("{}", issue);
            }
            print_json(&latest)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Regions { source } => {
            let map = source.load().await?;
            for region in map.regions() {
                println!("{}", region);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Validate { source } => {
            let map = source.load().await?;
            let issues = map.validate();
            print_json(&issues)?;
            Ok(if issues.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), StationMapError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
