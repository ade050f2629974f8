//! Chart Table Module
//! Named, plot-ready tables handed to the charting layer.

use crate::data::schema::{DEVELOPER, PRIMARY_GENRE};
use crate::stats::aggregator::{
    AnalysisResults, APP_COUNT, APP_TYPE, AVERAGE_RATING, AVERAGE_REVIEWS, BIN_START, COUNT,
    ESTIMATED_REVENUE, PERCENTAGE_PAID, RELEASE_YEAR, TOTAL_REVIEWS,
};
use polars::prelude::*;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChartError {
    #[error("Chart '{chart}' references missing column '{column}'")]
    MissingColumn { chart: String, column: String },
}

/// How the presenter is expected to draw a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Histogram,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Histogram => "histogram",
        };
        f.write_str(name)
    }
}

/// One chart's data: a frame plus the columns to put on each axis.
#[derive(Debug, Clone)]
pub struct ChartTable {
    pub kind: ChartKind,
    pub title: String,
    pub x: String,
    pub y: String,
    pub hue: Option<String>,
    pub data: DataFrame,
}

impl ChartTable {
    /// Build a chart table, checking that the named columns exist.
    pub fn new(
        kind: ChartKind,
        title: &str,
        data: &DataFrame,
        x: &str,
        y: &str,
        hue: Option<&str>,
    ) -> Result<Self, ChartError> {
        for column in [Some(x), Some(y), hue].into_iter().flatten() {
            if data.column(column).is_err() {
                return Err(ChartError::MissingColumn {
                    chart: title.to_string(),
                    column: column.to_string(),
                });
            }
        }

        Ok(Self {
            kind,
            title: title.to_string(),
            x: x.to_string(),
            y: y.to_string(),
            hue: hue.map(str::to_string),
            data: data.clone(),
        })
    }
}

/// One table per chart of the analysis, in presentation order.
pub fn chart_tables(results: &AnalysisResults) -> Result<Vec<ChartTable>, ChartError> {
    use ChartKind::{Bar, Histogram, Line};

    let r = results;
    let specs: [(ChartKind, &str, &DataFrame, &str, &str, Option<&str>); 14] = [
        (
            Bar,
            "Number of Apps by Genre",
            &r.genre_popularity,
            PRIMARY_GENRE,
            APP_COUNT,
            None,
        ),
        (
            Bar,
            "Average Rating by Genre",
            &r.genre_popularity,
            PRIMARY_GENRE,
            AVERAGE_RATING,
            None,
        ),
        (
            Bar,
            "Average Rating: Free vs Paid",
            &r.free_vs_paid,
            APP_TYPE,
            AVERAGE_RATING,
            None,
        ),
        (
            Bar,
            "Average Reviews: Free vs Paid",
            &r.free_vs_paid,
            APP_TYPE,
            AVERAGE_REVIEWS,
            None,
        ),
        (
            Histogram,
            "Price Distribution of Paid Apps",
            &r.price_histogram,
            BIN_START,
            COUNT,
            None,
        ),
        (
            Line,
            "Apps Released per Year",
            &r.yearly_trends,
            RELEASE_YEAR,
            APP_COUNT,
            None,
        ),
        (
            Line,
            "Average Rating per Year",
            &r.yearly_trends,
            RELEASE_YEAR,
            AVERAGE_RATING,
            None,
        ),
        (
            Bar,
            "Most Popular Genre per Year",
            &r.top_genre_per_year,
            RELEASE_YEAR,
            APP_COUNT,
            Some(PRIMARY_GENRE),
        ),
        (
            Bar,
            "Most Popular Non-Game Genre per Year",
            &r.top_non_game_genre_per_year,
            RELEASE_YEAR,
            APP_COUNT,
            Some(PRIMARY_GENRE),
        ),
        (
            Bar,
            "Percentage of Paid Apps by Genre",
            &r.percent_paid_per_genre,
            PRIMARY_GENRE,
            PERCENTAGE_PAID,
            None,
        ),
        (
            Bar,
            "Estimated Revenue by Genre (Price x Reviews)",
            &r.estimated_revenue_per_genre,
            PRIMARY_GENRE,
            ESTIMATED_REVENUE,
            None,
        ),
        (
            Bar,
            "Top Developers by Number of Apps",
            &r.top_developers_by_app_count,
            DEVELOPER,
            APP_COUNT,
            None,
        ),
        (
            Bar,
            "Top Developers by Average Rating",
            &r.top_developers_by_rating,
            DEVELOPER,
            AVERAGE_RATING,
            None,
        ),
        (
            Bar,
            "Top Developers by Total Reviews",
            &r.top_developers_by_reviews,
            DEVELOPER,
            TOTAL_REVIEWS,
            None,
        ),
    ];

    specs
        .into_iter()
        .map(|(kind, title, data, x, y, hue)| ChartTable::new(kind, title, data, x, y, hue))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_columns() {
        let df = df!("a" => [1], "b" => [2]).unwrap();
        assert!(ChartTable::new(ChartKind::Bar, "ok", &df, "a", "b", None).is_ok());

        let err = ChartTable::new(ChartKind::Bar, "bad", &df, "a", "b", Some("c")).unwrap_err();
        assert_eq!(
            err,
            ChartError::MissingColumn {
                chart: "bad".to_string(),
                column: "c".to_string()
            }
        );
    }

    #[test]
    fn kind_display() {
        assert_eq!(ChartKind::Histogram.to_string(), "histogram");
    }
}
