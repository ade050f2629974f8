//! Data Cleaner Module
//! Order-dependent cleaning of the app listing table.
//!
//! Each step takes the frame by value and returns the next state, so the
//! steps can be run and tested one at a time. [`DataCleaner::clean`] runs
//! them in the required order.

use crate::data::encoding::{CategoryCodes, CategoryEncodings};
use crate::data::loader::is_numeric_dtype;
use crate::data::schema::{
    self, SchemaError, APP_NAME, CATEGORICAL_COLUMNS, DROPPED_COLUMNS, FREE, PRICE, RELEASED,
    SIZE_BYTES,
};
use crate::data::values::{float_values, present_floats, string_values};
use crate::stats::StatsCalculator;
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

/// Fill value for `Size_Bytes` when no row carries a size.
pub const DEFAULT_SIZE_BYTES: f64 = 0.0;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// What the cleaning pass changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningSummary {
    pub rows_before: usize,
    pub dropped_missing_keys: usize,
    pub size_fill_value: f64,
    pub sizes_filled: usize,
    pub prices_filled: usize,
    pub duplicates_removed: usize,
    pub rows_after: usize,
}

/// Output of the cleaner: the cleaned frame plus the category dictionaries
/// used to derive its code columns.
#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub frame: DataFrame,
    pub encodings: CategoryEncodings,
    pub summary: CleaningSummary,
}

/// Runs the cleaning steps over a loaded table.
pub struct DataCleaner;

impl DataCleaner {
    /// Validate the schema and apply every cleaning step in order.
    pub fn clean(df: DataFrame) -> Result<CleanedTable, CleanError> {
        schema::validate_schema(&df)?;

        let mut summary = CleaningSummary {
            rows_before: df.height(),
            ..Default::default()
        };
        info!("Cleaning {} rows", summary.rows_before);

        // 1. Required keys
        let df = Self::drop_missing_keys(df)?;
        summary.dropped_missing_keys = summary.rows_before - df.height();
        debug!(
            "Dropped {} rows missing {} or {}",
            summary.dropped_missing_keys, APP_NAME, RELEASED
        );

        // 2. Median size
        summary.sizes_filled = df.column(SIZE_BYTES)?.null_count();
        let (df, median) = Self::fill_size_with_median(df)?;
        summary.size_fill_value = median;
        debug!(
            "Filled {} missing sizes with median {}",
            summary.sizes_filled, median
        );

        // 3. Price
        summary.prices_filled = df.column(PRICE)?.null_count();
        let df = Self::fill_missing_price(df)?;

        // 4. Unused columns
        let df = Self::drop_unused_columns(df)?;

        // 5. Duplicates
        let before_duplicates = df.height();
        let df = Self::remove_duplicates(df)?;
        summary.duplicates_removed = before_duplicates - df.height();
        debug!("Removed {} duplicate rows", summary.duplicates_removed);

        // 6-8. Text and categorical normalization
        let df = Self::title_case_names(df)?;
        let (df, encodings) = Self::encode_categories(df)?;
        let df = Self::normalize_free(df)?;

        summary.rows_after = df.height();
        info!(
            "Cleaning finished: {} -> {} rows",
            summary.rows_before, summary.rows_after
        );

        Ok(CleanedTable {
            frame: df,
            encodings,
            summary,
        })
    }

    /// Drop every record missing `App_Name` or `Released`.
    pub fn drop_missing_keys(df: DataFrame) -> PolarsResult<DataFrame> {
        df.lazy()
            .filter(
                col(APP_NAME)
                    .is_not_null()
                    .and(col(RELEASED).is_not_null()),
            )
            .collect()
    }

    /// Fill null sizes with the median of the non-null sizes.
    ///
    /// The median is computed once over the rows present when the step
    /// runs. Returns the fill value used.
    pub fn fill_size_with_median(df: DataFrame) -> PolarsResult<(DataFrame, f64)> {
        let sizes = present_floats(&df, SIZE_BYTES)?;
        let median = StatsCalculator::median(&sizes).unwrap_or(DEFAULT_SIZE_BYTES);

        let df = df
            .lazy()
            .with_column(
                col(SIZE_BYTES)
                    .cast(DataType::Float64)
                    .fill_null(lit(median)),
            )
            .collect()?;
        Ok((df, median))
    }

    /// Missing prices become 0.
    pub fn fill_missing_price(df: DataFrame) -> PolarsResult<DataFrame> {
        df.lazy()
            .with_column(col(PRICE).cast(DataType::Float64).fill_null(lit(0.0)))
            .collect()
    }

    /// Drop the developer link columns.
    pub fn drop_unused_columns(df: DataFrame) -> PolarsResult<DataFrame> {
        let mut df = df;
        for name in DROPPED_COLUMNS {
            df = df.drop(name)?;
        }
        Ok(df)
    }

    /// Remove exact full-row duplicates, keeping the first occurrence.
    pub fn remove_duplicates(df: DataFrame) -> PolarsResult<DataFrame> {
        df.lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()
    }

    /// Title-case every app name.
    pub fn title_case_names(df: DataFrame) -> PolarsResult<DataFrame> {
        let titled: Vec<Option<String>> = string_values(&df, APP_NAME)?
            .into_iter()
            .map(|name| name.map(|n| title_case(&n)))
            .collect();

        let mut df = df;
        df.with_column(Column::new(APP_NAME.into(), titled))?;
        Ok(df)
    }

    /// Add a `<Column>_Code` integer column for each categorical column.
    pub fn encode_categories(df: DataFrame) -> PolarsResult<(DataFrame, CategoryEncodings)> {
        let mut df = df;
        let mut encodings = CategoryEncodings::new();

        for name in CATEGORICAL_COLUMNS {
            let values = string_values(&df, name)?;
            let codes = CategoryCodes::from_values(values.iter().map(|v| v.as_deref()));
            let encoded: Vec<i32> = values.iter().map(|v| codes.encode(v.as_deref())).collect();

            debug!("Encoded {} with {} categories", name, codes.len());
            df.with_column(Column::new(schema::code_column(name).into(), encoded))?;
            encodings.insert(name.to_string(), codes);
        }

        Ok((df, encodings))
    }

    /// Coerce `Free` to Int32 0/1.
    pub fn normalize_free(df: DataFrame) -> PolarsResult<DataFrame> {
        let column = df.column(FREE)?;
        let flags: Vec<i32> = match column.dtype() {
            DataType::Boolean => column
                .bool()?
                .into_iter()
                .map(|v| i32::from(v.unwrap_or(false)))
                .collect(),
            dtype if is_numeric_dtype(dtype) => float_values(&df, FREE)?
                .into_iter()
                .map(|v| i32::from(v.is_some_and(|x| x != 0.0 && !x.is_nan())))
                .collect(),
            _ => string_values(&df, FREE)?
                .into_iter()
                .map(|v| i32::from(v.as_deref().is_some_and(parse_truthy)))
                .collect(),
        };

        let mut df = df;
        df.with_column(Column::new(FREE.into(), flags))?;
        Ok(df)
    }
}

/// Capitalize the first character of each whitespace-separated word and
/// lower-case the rest. Whitespace is kept as is.
///
/// A first character whose upper-case form expands to several characters
/// is left unchanged so that the transform stays idempotent.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;

    for ch in text.chars() {
        if ch.is_whitespace() {
            out.push(ch);
            at_word_start = true;
        } else if at_word_start {
            let mut upper = ch.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => out.push(u),
                _ => out.push(ch),
            }
            at_word_start = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    out
}

/// Text form of a boolean flag. Unrecognized non-empty text counts as true.
fn parse_truthy(text: &str) -> bool {
    match text.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "f" | "no" | "n" | "0" | "0.0" => false,
        _ => true,
    }
}
