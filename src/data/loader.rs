//! CSV Data Loader Module
//! Reads the daily rental CSV into a `RentalTable` using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::table::RentalTable;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

/// Loads the rental dataset with Polars.
pub struct DataLoader {
    infer_schema_length: usize,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: 10_000,
        }
    }

    /// Load a CSV file into an immutable rental table.
    ///
    /// Malformed cells become null instead of failing the load; a missing
    /// file, unreadable content or a missing required column is an error.
    pub fn load_csv(&self, file_path: impl AsRef<Path>) -> Result<RentalTable, LoaderError> {
        let path = file_path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        debug!(path = %path.display(), "Reading CSV");
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let table = RentalTable::from_frame(df)?;

        let missing = table.missing_date_count();
        if missing > 0 {
            warn!(
                rows = missing,
                "Rows with unparseable dates will be excluded from all charts"
            );
        }
        info!(
            rows = table.height(),
            path = %path.display(),
            "Loaded rental data"
        );

        Ok(table)
    }
}
