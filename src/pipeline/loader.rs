//! Dataset loader for the semicolon-delimited PEDE export (CSV or Parquet)

use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, warn};

use super::columns::malformed_numeric_cells;
use super::missing::drop_incomplete_rows;
use super::schema::{numeric_columns, required_columns};
use crate::error::DatasetError;

/// Field separator of the PEDE export
pub const CSV_SEPARATOR: u8 = b';';

/// Default dataset location, relative to the working directory
pub const DEFAULT_DATASET_PATH: &str = "dataset/PEDE_PASSOS_DATASET_FIAP.csv";

/// The loaded dataset, shared read-only by every view.
///
/// `raw` is the table as read (every CSV column kept as text so malformed
/// numbers survive until a view coerces them); `complete` holds only the rows
/// with no missing field at all.
#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
    raw: DataFrame,
    complete: DataFrame,
    malformed: Vec<(String, usize)>,
}

impl Dataset {
    /// Load, validate and clean the dataset at `path`
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let raw = load_dataset(path)?;
        Self::from_frame(path, raw)
    }

    /// Build a dataset from an already loaded table
    pub fn from_frame(path: &Path, raw: DataFrame) -> Result<Self, DatasetError> {
        let present: Vec<String> = raw
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let missing: Vec<String> = required_columns()
            .into_iter()
            .filter(|c| !present.contains(c))
            .collect();
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing,
            });
        }

        let complete = drop_incomplete_rows(&raw).map_err(|source| DatasetError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            rows = raw.height(),
            complete_rows = complete.height(),
            "dataset cleaned"
        );

        let malformed = malformed_numeric_cells(&raw, &numeric_columns());
        if !malformed.is_empty() {
            let cells: usize = malformed.iter().map(|(_, n)| n).sum();
            let columns: Vec<&str> = malformed.iter().map(|(c, _)| c.as_str()).collect();
            warn!(
                cells,
                columns = %columns.join(", "),
                "non-numeric cells will be treated as missing"
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            raw,
            complete,
            malformed,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Table exactly as read
    pub fn raw(&self) -> &DataFrame {
        &self.raw
    }

    /// Rows without any missing field
    pub fn complete(&self) -> &DataFrame {
        &self.complete
    }

    /// Columns with present but non-numeric cells, and how many
    pub fn malformed_cells(&self) -> &[(String, usize)] {
        &self.malformed
    }

    /// Estimated in-memory size of the raw table in megabytes
    pub fn estimated_mb(&self) -> f64 {
        self.raw.estimated_size() as f64 / (1024.0 * 1024.0)
    }
}

/// Read a dataset file (CSV or Parquet based on extension).
///
/// CSV columns are all read as text; numeric interpretation is deferred to
/// the views so a single malformed cell never fails the load.
pub fn load_dataset(path: &Path) -> Result<DataFrame, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let unreadable = |source: PolarsError| DatasetError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_separator(CSV_SEPARATOR)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()
            .map_err(unreadable)?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default()).map_err(unreadable)?,
        _ => {
            return Err(DatasetError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            })
        }
    };

    let mut df = lf.collect().map_err(unreadable)?;
    df.as_single_chunk_par();
    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "dataset read");
    Ok(df)
}
