//! Profiler Module
//! Shape, dtype, missing-value and numeric summaries of a loaded table,
//! plus the missing-values text report.

use crate::data::loader::numeric_columns;
use crate::data::values::present_floats;
use crate::stats::calculator::{NumericSummary, StatsCalculator};
use polars::prelude::*;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

/// Header line of the missing-values report.
pub const MISSING_VALUES_HEADER: &str = "Missing values in each column:";

/// Spaces between the name and count columns of the report.
const REPORT_GUTTER: usize = 3;

/// Dtype and completeness of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
}

/// Everything the profiler reports about a table.
#[derive(Debug, Clone)]
pub struct TableProfile {
    pub rows: usize,
    pub columns: usize,
    pub column_info: Vec<ColumnInfo>,
    /// Null count per column, in original column order.
    pub null_counts: Vec<(String, usize)>,
    pub numeric: Vec<NumericSummary>,
    pub preview: DataFrame,
}

impl TableProfile {
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn total_nulls(&self) -> usize {
        self.null_counts.iter().map(|(_, n)| n).sum()
    }

    /// Rendered missing-values report.
    pub fn missing_values_report(&self) -> String {
        format_missing_values(&self.null_counts)
    }
}

/// Computes table profiles.
pub struct Profiler;

impl Profiler {
    pub fn profile(df: &DataFrame, preview_rows: usize) -> PolarsResult<TableProfile> {
        let column_info = df
            .get_columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                dtype: col.dtype().to_string(),
                non_null: col.len() - col.null_count(),
            })
            .collect();

        let numeric = numeric_columns(df)
            .iter()
            .map(|name| -> PolarsResult<NumericSummary> {
                let values = present_floats(df, name)?;
                Ok(StatsCalculator::describe(name, &values))
            })
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(TableProfile {
            rows: df.height(),
            columns: df.width(),
            column_info,
            null_counts: Self::null_counts(df),
            numeric,
            preview: df.head(Some(preview_rows)),
        })
    }

    /// Null count per column in column order.
    pub fn null_counts(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }

    /// Persist the missing-values report.
    pub fn write_missing_values_report(
        path: &Path,
        null_counts: &[(String, usize)],
    ) -> io::Result<()> {
        fs::write(path, format_missing_values(null_counts))?;
        info!("Wrote missing values summary to {}", path.display());
        Ok(())
    }
}

/// Render null counts the way a tabular series printer lays them out:
/// names left-aligned, counts right-aligned with a leading sign space,
/// three spaces between the two columns, no trailing newline.
pub fn format_missing_values(null_counts: &[(String, usize)]) -> String {
    let counts: Vec<String> = null_counts.iter().map(|(_, n)| format!(" {n}")).collect();
    let name_width = null_counts
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);
    let count_width = counts.iter().map(String::len).max().unwrap_or(0);

    let mut out = String::from(MISSING_VALUES_HEADER);
    out.push('\n');

    let lines: Vec<String> = null_counts
        .iter()
        .zip(&counts)
        .map(|((name, _), count)| {
            format!(
                "{name:<name_width$}{gutter}{count:>count_width$}",
                gutter = " ".repeat(REPORT_GUTTER)
            )
        })
        .collect();
    out.push_str(&lines.join("\n"));
    out
}
