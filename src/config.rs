//! Analysis configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Optional override file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "appstore_eda.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Settings for one analysis run. Every field has a default, so an override
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub input_path: PathBuf,
    pub report_path: PathBuf,
    pub preview_rows: usize,
    /// Length of every top-N ranking.
    pub top_n: usize,
    /// Minimum apps a developer needs to enter the rating ranking.
    pub min_apps_for_rating_rank: usize,
    pub price_bins: usize,
    /// Genre left out of the "top non-game genre" query.
    pub excluded_genre: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("appleAppData.csv"),
            report_path: PathBuf::from("missing_values_summary.txt"),
            preview_rows: 5,
            top_n: 10,
            min_apps_for_rating_rank: 5,
            price_bins: 20,
            excluded_genre: "Games".to_string(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the override file if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.is_file() {
            Self::from_json_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::Zero("top_n"));
        }
        if self.price_bins == 0 {
            return Err(ConfigError::Zero("price_bins"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_override_keeps_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"top_n": 3, "input_path": "data/apps.csv"}}"#).unwrap();

        let config = AnalysisConfig::from_json_file(tmp.path()).unwrap();
        assert_eq!(config.top_n, 3);
        assert_eq!(config.input_path, PathBuf::from("data/apps.csv"));
        assert_eq!(config.min_apps_for_rating_rank, 5);
        assert_eq!(config.excluded_genre, "Games");
    }

    #[test]
    fn rejects_zero_top_n() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, r#"{{"top_n": 0}}"#).unwrap();
        let err = AnalysisConfig::from_json_file(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Zero("top_n")));
    }

    #[test]
    fn missing_file_means_defaults() {
        let config = AnalysisConfig::load_or_default(Path::new("/no/such/config.json")).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }
}
