//! Offline conversion of raw CSV exports into the JSON arrays the dashboard reads.

use crate::convert::error::ConvertError;
use bon::Builder;
use log::{error, info};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};

/// Number of `data_N.csv` measurement exports in the default file list.
const DEFAULT_DATA_FILES: usize = 10;

/// The exports converted when no explicit file list is given.
pub fn default_files() -> Vec<String> {
    let mut files = vec!["weather_stations.csv".to_string(), "variables.csv".to_string()];
    files.extend((1..=DEFAULT_DATA_FILES).map(|n| format!("data_{}.csv", n)));
    files
}

/// Which CSV files to convert and where to put the JSON.
///
/// ```
/// use stationmap::ConvertPlan;
///
/// let plan = ConvertPlan::builder()
///     .input_dir("scripts")
///     .output_dir("data")
///     .build();
/// assert_eq!(plan.files.len(), 12);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ConvertPlan {
    #[builder(into)]
    pub input_dir: PathBuf,
    #[builder(into)]
    pub output_dir: PathBuf,
    #[builder(default = default_files())]
    pub files: Vec<String>,
}

/// What happened to each file of a [`ConvertPlan`].
#[derive(Debug, Default)]
pub struct ConvertSummary {
    /// `(input, output)` pairs that were written.
    pub converted: Vec<(PathBuf, PathBuf)>,
    pub failed: Vec<(PathBuf, ConvertError)>,
}

impl ConvertSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl ConvertPlan {
    /// `x.csv` -> `<output_dir>/x.json`.
    pub fn output_path(&self, file: &str) -> PathBuf {
        self.output_dir.join(Path::new(file).with_extension("json"))
    }

    /// Converts every file in turn. A failing file is logged and recorded; the
    /// rest still convert. Only an unusable output directory aborts the run.
    pub async fn run(&self) -> Result<ConvertSummary, ConvertError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| ConvertError::OutputDirCreation(self.output_dir.clone(), e))?;

        let mut summary = ConvertSummary::default();
        for file in &self.files {
            let input = self.input_dir.join(file);
            let output = self.output_path(file);

            let (input_owned, output_owned) = (input.clone(), output.clone());
            let result =
                task::spawn_blocking(move || csv_file_to_json(&input_owned, &output_owned)).await?;

            match result {
                Ok(rows) => {
                    info!(
                        "Converted {} -> {} ({} rows)",
                        input.display(),
                        output.display(),
                        rows
                    );
                    summary.converted.push((input, output));
                }
                Err(e) => {
                    error!("Failed to convert {}: {}", input.display(), e);
                    summary.failed.push((input, e));
                }
            }
        }
        Ok(summary)
    }
}

/// Reads `input` with every column as a string and writes it to `output` as a
/// JSON array of objects keyed by the CSV header. Returns the row count.
///
/// The JSON is written to a temporary file next to `output` and renamed into
/// place, so readers never see a half-written artifact.
pub fn csv_file_to_json(input: &Path, output: &Path) -> Result<usize, ConvertError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        // Zero inference rows: every column is read as String.
        .with_infer_schema_length(Some(0))
        // Blank cells stay empty strings instead of becoming JSON null.
        .map_parse_options(|opts| opts.with_missing_is_null(false))
        .try_into_reader_with_file_path(Some(input.to_path_buf()))
        .map_err(|e| ConvertError::CsvRead {
            path: input.to_path_buf(),
            source: e,
        })?
        .finish()
        .map_err(|e| ConvertError::CsvRead {
            path: input.to_path_buf(),
            source: e,
        })?;

    let dir = output.parent().unwrap_or_else(|| Path::new("."));
    let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| ConvertError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    JsonWriter::new(&mut temp_file)
        .with_json_format(JsonFormat::Json)
        .finish(&mut df)
        .map_err(|e| ConvertError::JsonWrite {
            path: output.to_path_buf(),
            source: e,
        })?;
    temp_file.persist(output).map_err(|e| ConvertError::Io {
        path: output.to_path_buf(),
        source: e.error,
    })?;

    Ok(df.height())
}
