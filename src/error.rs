//! Fatal dataset errors.
//!
//! Loading the dataset is the only operation allowed to fail for good. Every
//! variant here is a configuration problem the user has to fix (wrong path,
//! wrong file, wrong schema); malformed cells inside a readable file are
//! never reported through this type, they are coerced to missing instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while opening and validating the input dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The configured dataset path does not exist.
    #[error("dataset not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The file extension is neither csv nor parquet.
    #[error("unsupported dataset format '{extension}' for {}: expected csv or parquet", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The file exists but could not be parsed into a table.
    #[error("failed to read dataset {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: polars::prelude::PolarsError,
    },

    /// The header lacks columns the views depend on.
    #[error("dataset {} is missing required columns: {}", path.display(), columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },
}

impl DatasetError {
    /// Path of the dataset the error refers to
    pub fn path(&self) -> &PathBuf {
        match self {
            DatasetError::NotFound { path }
            | DatasetError::UnsupportedFormat { path, .. }
            | DatasetError::Unreadable { path, .. }
            | DatasetError::MissingColumns { path, .. } => path,
        }
    }
}
