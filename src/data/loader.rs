//! CSV Data Loader Module
//! Handles loading the app listing file into a Polars DataFrame.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Rows scanned for schema inference.
const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Loads the app listing CSV with Polars and keeps the resulting frame.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Read a comma-delimited file with a header row.
    ///
    /// Column types are inferred; date-like columns stay as text.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoadError> {
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        debug!("Reading CSV from {}", path.display());
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .finish()?
            .collect()?;

        info!("Loaded {} rows x {} columns", df.height(), df.width());
        Ok(df)
    }

    /// Load a CSV file and keep it as the current frame.
    pub fn load_csv(&mut self, path: impl AsRef<Path>) -> Result<&DataFrame, LoadError> {
        let path = path.as_ref();
        let df = Self::read_csv(path)?;
        self.file_path = Some(path.to_path_buf());
        Ok(self.df.insert(df))
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get list of numeric column names.
    pub fn get_numeric_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(numeric_columns)
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Hand the loaded frame over to the next stage.
    pub fn take_dataframe(&mut self) -> Option<DataFrame> {
        self.df.take()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

/// Whether a dtype is one of the integer or float types.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Names of the numeric columns of a frame, in column order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| is_numeric_dtype(col.dtype()))
        .map(|col| col.name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_file_is_not_found() {
        let err = DataLoader::read_csv(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn infers_numeric_and_text_columns() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "App_Name,Price,Released\nfoo,1.99,2020-01-01\nbar,,2021-02-03\n").unwrap();

        let mut loader = DataLoader::new();
        let df = loader.load_csv(tmp.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Price").unwrap().null_count(), 1);

        assert_eq!(loader.get_row_count(), 2);
        assert_eq!(loader.get_columns(), vec!["App_Name", "Price", "Released"]);
        assert_eq!(loader.get_numeric_columns(), vec!["Price"]);
        assert_eq!(loader.get_file_path().unwrap(), tmp.path());
    }
}
