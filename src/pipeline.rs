//! Pipeline Module
//! Runs load, profile, clean, aggregate and present in order.

use crate::charts::{chart_tables, ChartError, ChartTable};
use crate::config::{AnalysisConfig, ConfigError};
use crate::data::{CleanError, CleanedTable, DataCleaner, DataLoader, LoadError};
use crate::stats::{AnalysisResults, Aggregator, ComputationError, Profiler, TableProfile};
use polars::prelude::*;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Load stage failed: {0}")]
    Load(#[from] LoadError),
    #[error("Profile stage failed: {0}")]
    Profile(#[source] PolarsError),
    #[error("Profile stage failed to write the missing values summary: {0}")]
    Report(#[from] std::io::Error),
    #[error("Clean stage failed: {0}")]
    Clean(#[from] CleanError),
    #[error("Aggregate stage failed: {0}")]
    Aggregate(#[from] ComputationError),
    #[error("Present stage failed: {0}")]
    Present(#[from] ChartError),
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub profile: TableProfile,
    /// Null counts per column after cleaning.
    pub remaining_nulls: Vec<(String, usize)>,
    pub cleaned: CleanedTable,
    pub results: AnalysisResults,
    pub charts: Vec<ChartTable>,
}

pub struct Pipeline {
    config: AnalysisConfig,
}

impl Pipeline {
    pub fn new(config: AnalysisConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load the configured input file and run every stage.
    pub fn run(&self) -> Result<PipelineOutput, PipelineError> {
        info!("Loading dataset from {}", self.config.input_path.display());
        let df = DataLoader::read_csv(&self.config.input_path)?;
        self.run_frame(df)
    }

    /// Run every stage after loading over an already loaded table.
    pub fn run_frame(&self, df: DataFrame) -> Result<PipelineOutput, PipelineError> {
        let profile =
            Profiler::profile(&df, self.config.preview_rows).map_err(PipelineError::Profile)?;
        info!(
            "Profiled {} rows x {} columns, {} missing values",
            profile.rows,
            profile.columns,
            profile.total_nulls()
        );
        Profiler::write_missing_values_report(&self.config.report_path, &profile.null_counts)?;

        let cleaned = DataCleaner::clean(df)?;
        let remaining_nulls = Profiler::null_counts(&cleaned.frame);
        for (column, count) in remaining_nulls.iter().filter(|(_, n)| *n > 0) {
            info!("{} still has {} missing values after cleaning", column, count);
        }

        let aggregator = Aggregator::new(&cleaned.frame, &self.config)?;
        let results = aggregator.run_all()?;
        let charts = chart_tables(&results)?;
        info!("Prepared {} chart tables", charts.len());

        Ok(PipelineOutput {
            profile,
            remaining_nulls,
            cleaned,
            results,
            charts,
        })
    }
}
