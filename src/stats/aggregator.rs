//! Aggregator Module
//! Group-level queries over the cleaned app table.
//!
//! Every query reads the table and returns a new frame; none mutate it.
//! Groups with a null key are skipped. Means ignore null and NaN values and
//! are null for a group without any. Rankings and per-group argmax break
//! ties by ascending key.

use crate::config::AnalysisConfig;
use crate::data::schema::{
    AVERAGE_USER_RATING, DEVELOPER, FREE, PRICE, PRIMARY_GENRE, RELEASED, REVIEWS,
};
use crate::data::values::{float_values, present_floats, string_values};
use crate::stats::StatsCalculator;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

pub const RELEASE_YEAR: &str = "Release_Year";
pub const APP_COUNT: &str = "App_Count";
pub const AVERAGE_RATING: &str = "Average_Rating";
pub const AVERAGE_REVIEWS: &str = "Average_Reviews";
pub const APP_TYPE: &str = "App_Type";
pub const TOTAL_APPS: &str = "Total_Apps";
pub const PAID_APPS: &str = "Paid_Apps";
pub const PERCENTAGE_PAID: &str = "Percentage_Paid";
pub const ESTIMATED_REVENUE: &str = "Estimated_Revenue";
pub const TOTAL_REVIEWS: &str = "Total_Reviews";
pub const BIN_START: &str = "Bin_Start";
pub const BIN_END: &str = "Bin_End";
pub const COUNT: &str = "Count";

#[derive(Error, Debug)]
pub enum ComputationError {
    #[error("Division by zero while computing {context}")]
    ZeroDivision { context: String },
    #[error("Empty group while computing {context}")]
    EmptyGroup { context: String },
    #[error("Unparseable release date {value:?} at row {row}")]
    InvalidDate { row: usize, value: String },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Every aggregate the pipeline hands to the presenter.
#[derive(Debug, Clone)]
pub struct AnalysisResults {
    pub genre_popularity: DataFrame,
    pub free_vs_paid: DataFrame,
    pub paid_prices: DataFrame,
    pub price_histogram: DataFrame,
    pub yearly_trends: DataFrame,
    pub top_genre_per_year: DataFrame,
    pub top_non_game_genre_per_year: DataFrame,
    pub percent_paid_per_genre: DataFrame,
    pub estimated_revenue_per_genre: DataFrame,
    pub top_developers_by_app_count: DataFrame,
    pub top_developers_by_rating: DataFrame,
    pub top_developers_by_reviews: DataFrame,
}

/// Running mean that skips missing values.
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| !v.is_nan()) {
            self.sum += v;
            self.n += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

/// Count of rows plus a mean of one value column.
#[derive(Debug, Clone, Copy, Default)]
struct CountMean {
    count: usize,
    mean: Mean,
}

/// Runs the aggregation queries over a cleaned table.
pub struct Aggregator<'a> {
    df: &'a DataFrame,
    config: &'a AnalysisConfig,
    years: Vec<Option<i32>>,
}

impl<'a> Aggregator<'a> {
    /// Prepare the queries; derives the release year of every row.
    pub fn new(df: &'a DataFrame, config: &'a AnalysisConfig) -> Result<Self, ComputationError> {
        let years = release_years(df)?;
        Ok(Self { df, config, years })
    }

    pub fn run_all(&self) -> Result<AnalysisResults, ComputationError> {
        let results = AnalysisResults {
            genre_popularity: self.genre_popularity()?,
            free_vs_paid: self.free_vs_paid()?,
            paid_prices: self.paid_price_distribution()?,
            price_histogram: self.price_histogram()?,
            yearly_trends: self.yearly_trends()?,
            top_genre_per_year: self.top_genre_per_year()?,
            top_non_game_genre_per_year: self.top_non_game_genre_per_year()?,
            percent_paid_per_genre: self.percent_paid_per_genre()?,
            estimated_revenue_per_genre: self.estimated_revenue_per_genre()?,
            top_developers_by_app_count: self.top_developers_by_app_count()?,
            top_developers_by_rating: self.top_developers_by_rating()?,
            top_developers_by_reviews: self.top_developers_by_reviews()?,
        };
        debug!("Computed all aggregates over {} rows", self.df.height());
        Ok(results)
    }

    /// The cleaned frame with a `Release_Year` column appended.
    pub fn with_release_year(&self) -> Result<DataFrame, ComputationError> {
        let mut df = self.df.clone();
        df.with_column(Column::new(RELEASE_YEAR.into(), self.years.clone()))?;
        Ok(df)
    }

    /// App count and mean rating per genre, most popular first.
    pub fn genre_popularity(&self) -> Result<DataFrame, ComputationError> {
        let groups = self.count_mean_by(PRIMARY_GENRE, AVERAGE_USER_RATING)?;

        let mut rows: Vec<(String, CountMean)> = groups.into_iter().collect();
        rows.sort_by(|a, b| b.1.count.cmp(&a.1.count));

        let df = DataFrame::new(vec![
            Column::new(
                PRIMARY_GENRE.into(),
                rows.iter().map(|(g, _)| g.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(APP_COUNT.into(), counts(rows.iter().map(|(_, s)| s.count))),
            Column::new(
                AVERAGE_RATING.into(),
                rows.iter().map(|(_, s)| s.mean.value()).collect::<Vec<_>>(),
            ),
        ])?;
        Ok(df)
    }

    /// Mean rating and mean reviews for paid (0) and free (1) apps.
    pub fn free_vs_paid(&self) -> Result<DataFrame, ComputationError> {
        let flags = float_values(self.df, FREE)?;
        let ratings = float_values(self.df, AVERAGE_USER_RATING)?;
        let reviews = float_values(self.df, REVIEWS)?;

        let mut groups: BTreeMap<i32, (Mean, Mean)> = BTreeMap::new();
        for ((flag, rating), review) in flags.iter().zip(&ratings).zip(&reviews) {
            let Some(flag) = flag else { continue };
            let entry = groups.entry(*flag as i32).or_default();
            entry.0.push(*rating);
            entry.1.push(*review);
        }

        let df = DataFrame::new(vec![
            Column::new(FREE.into(), groups.keys().copied().collect::<Vec<i32>>()),
            Column::new(
                APP_TYPE.into(),
                groups.keys().map(|f| app_type_label(*f)).collect::<Vec<_>>(),
            ),
            Column::new(
                AVERAGE_RATING.into(),
                groups.values().map(|(r, _)| r.value()).collect::<Vec<_>>(),
            ),
            Column::new(
                AVERAGE_REVIEWS.into(),
                groups.values().map(|(_, v)| v.value()).collect::<Vec<_>>(),
            ),
        ])?;
        Ok(df)
    }

    /// Prices of paid apps, ready for a histogram.
    pub fn paid_price_distribution(&self) -> Result<DataFrame, ComputationError> {
        let paid = self
            .df
            .clone()
            .lazy()
            .filter(col(PRICE).gt(lit(0.0)))
            .select([col(PRICE)])
            .collect()?;
        Ok(paid)
    }

    /// Equal-width histogram of paid app prices.
    pub fn price_histogram(&self) -> Result<DataFrame, ComputationError> {
        let prices = present_floats(&self.paid_price_distribution()?, PRICE)?;
        let bins = StatsCalculator::histogram(&prices, self.config.price_bins);

        let df = DataFrame::new(vec![
            Column::new(
                BIN_START.into(),
                bins.iter().map(|b| b.0).collect::<Vec<f64>>(),
            ),
            Column::new(BIN_END.into(), bins.iter().map(|b| b.1).collect::<Vec<f64>>()),
            Column::new(COUNT.into(), counts(bins.iter().map(|b| b.2))),
        ])?;
        Ok(df)
    }

    /// Releases and mean rating per calendar year.
    pub fn yearly_trends(&self) -> Result<DataFrame, ComputationError> {
        let ratings = float_values(self.df, AVERAGE_USER_RATING)?;

        let mut groups: BTreeMap<i32, CountMean> = BTreeMap::new();
        for (year, rating) in self.years.iter().zip(&ratings) {
            let Some(year) = year else { continue };
            let entry = groups.entry(*year).or_default();
            entry.count += 1;
            entry.mean.push(*rating);
        }

        let df = DataFrame::new(vec![
            Column::new(
                RELEASE_YEAR.into(),
                groups.keys().copied().collect::<Vec<i32>>(),
            ),
            Column::new(APP_COUNT.into(), counts(groups.values().map(|s| s.count))),
            Column::new(
                AVERAGE_RATING.into(),
                groups.values().map(|s| s.mean.value()).collect::<Vec<_>>(),
            ),
        ])?;
        Ok(df)
    }

    /// The genre with the most releases in each year.
    pub fn top_genre_per_year(&self) -> Result<DataFrame, ComputationError> {
        self.top_genre_per_year_excluding(None)
    }

    /// Same as [`Self::top_genre_per_year`] with the configured genre
    /// (Games by default) filtered out first.
    pub fn top_non_game_genre_per_year(&self) -> Result<DataFrame, ComputationError> {
        self.top_genre_per_year_excluding(Some(self.config.excluded_genre.as_str()))
    }

    fn top_genre_per_year_excluding(
        &self,
        excluded: Option<&str>,
    ) -> Result<DataFrame, ComputationError> {
        let genres = string_values(self.df, PRIMARY_GENRE)?;

        let mut by_year: BTreeMap<i32, BTreeMap<String, usize>> = BTreeMap::new();
        for (year, genre) in self.years.iter().zip(genres) {
            let (Some(year), Some(genre)) = (year, genre) else {
                continue;
            };
            if excluded == Some(genre.as_str()) {
                continue;
            }
            *by_year.entry(*year).or_default().entry(genre).or_default() += 1;
        }

        let mut years = Vec::with_capacity(by_year.len());
        let mut top_genres = Vec::with_capacity(by_year.len());
        let mut top_counts = Vec::with_capacity(by_year.len());
        for (year, genre_counts) in &by_year {
            let (genre, count) = argmax(genre_counts).ok_or_else(|| {
                ComputationError::EmptyGroup {
                    context: format!("top genre for {year}"),
                }
            })?;
            years.push(*year);
            top_genres.push(genre.clone());
            top_counts.push(count);
        }

        let df = DataFrame::new(vec![
            Column::new(RELEASE_YEAR.into(), years),
            Column::new(PRIMARY_GENRE.into(), top_genres),
            Column::new(APP_COUNT.into(), counts(top_counts)),
        ])?;
        Ok(df)
    }

    /// Share of paid apps (price above zero) per genre, highest first.
    pub fn percent_paid_per_genre(&self) -> Result<DataFrame, ComputationError> {
        let genres = string_values(self.df, PRIMARY_GENRE)?;
        let prices = float_values(self.df, PRICE)?;

        let mut groups: BTreeMap<String, (usize, usize)> = BTreeMap::new();
        for (genre, price) in genres.into_iter().zip(prices) {
            let Some(genre) = genre else { continue };
            let entry = groups.entry(genre).or_default();
            entry.0 += 1;
            if price.is_some_and(|p| p > 0.0) {
                entry.1 += 1;
            }
        }

        let mut rows = Vec::with_capacity(groups.len());
        for (genre, (total, paid)) in groups {
            let pct = percentage(paid, total, &genre)?;
            rows.push((genre, total, paid, pct));
        }
        rows.sort_by(|a, b| b.3.total_cmp(&a.3));

        let df = DataFrame::new(vec![
            Column::new(
                PRIMARY_GENRE.into(),
                rows.iter().map(|r| r.0.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(TOTAL_APPS.into(), counts(rows.iter().map(|r| r.1))),
            Column::new(PAID_APPS.into(), counts(rows.iter().map(|r| r.2))),
            Column::new(
                PERCENTAGE_PAID.into(),
                rows.iter().map(|r| r.3).collect::<Vec<f64>>(),
            ),
        ])?;
        Ok(df)
    }

    /// Top genres by `Price * Reviews`.
    ///
    /// Reviews stand in for purchases here; the figure is a rough heuristic
    /// and not a revenue estimate anyone should rely on.
    pub fn estimated_revenue_per_genre(&self) -> Result<DataFrame, ComputationError> {
        let genres = string_values(self.df, PRIMARY_GENRE)?;
        let prices = float_values(self.df, PRICE)?;
        let reviews = float_values(self.df, REVIEWS)?;

        let mut groups: BTreeMap<String, f64> = BTreeMap::new();
        for ((genre, price), review) in genres.into_iter().zip(prices).zip(reviews) {
            let Some(genre) = genre else { continue };
            let total = groups.entry(genre).or_default();
            if let (Some(p), Some(r)) = (price, review) {
                if !(p * r).is_nan() {
                    *total += p * r;
                }
            }
        }

        let rows = top_n(groups, self.config.top_n, |a, b| b.total_cmp(a));
        let df = DataFrame::new(vec![
            Column::new(
                PRIMARY_GENRE.into(),
                rows.iter().map(|r| r.0.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                ESTIMATED_REVENUE.into(),
                rows.iter().map(|r| r.1).collect::<Vec<f64>>(),
            ),
        ])?;
        Ok(df)
    }

    /// Developers with the most apps.
    pub fn top_developers_by_app_count(&self) -> Result<DataFrame, ComputationError> {
        let groups = self.count_mean_by(DEVELOPER, AVERAGE_USER_RATING)?;
        let by_count: BTreeMap<String, usize> =
            groups.into_iter().map(|(d, s)| (d, s.count)).collect();

        let rows = top_n(by_count, self.config.top_n, |a, b| b.cmp(a));
        let df = DataFrame::new(vec![
            Column::new(
                DEVELOPER.into(),
                rows.iter().map(|r| r.0.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(APP_COUNT.into(), counts(rows.iter().map(|r| r.1))),
        ])?;
        Ok(df)
    }

    /// Highest mean rating among developers with enough apps.
    pub fn top_developers_by_rating(&self) -> Result<DataFrame, ComputationError> {
        let min_apps = self.config.min_apps_for_rating_rank;
        let eligible: BTreeMap<String, (usize, f64)> = self
            .count_mean_by(DEVELOPER, AVERAGE_USER_RATING)?
            .into_iter()
            .filter(|(_, s)| s.count >= min_apps)
            .filter_map(|(d, s)| s.mean.value().map(|m| (d, (s.count, m))))
            .collect();

        let rows = top_n(eligible, self.config.top_n, |a, b| b.1.total_cmp(&a.1));
        let df = DataFrame::new(vec![
            Column::new(
                DEVELOPER.into(),
                rows.iter().map(|r| r.0.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(APP_COUNT.into(), counts(rows.iter().map(|r| r.1 .0))),
            Column::new(
                AVERAGE_RATING.into(),
                rows.iter().map(|r| r.1 .1).collect::<Vec<f64>>(),
            ),
        ])?;
        Ok(df)
    }

    /// Developers with the most reviews across all their apps.
    pub fn top_developers_by_reviews(&self) -> Result<DataFrame, ComputationError> {
        let developers = string_values(self.df, DEVELOPER)?;
        let reviews = float_values(self.df, REVIEWS)?;

        let mut groups: BTreeMap<String, f64> = BTreeMap::new();
        for (developer, review) in developers.into_iter().zip(reviews) {
            let Some(developer) = developer else { continue };
            let total = groups.entry(developer).or_default();
            if let Some(r) = review.filter(|r| !r.is_nan()) {
                *total += r;
            }
        }

        let rows = top_n(groups, self.config.top_n, |a, b| b.total_cmp(a));
        let df = DataFrame::new(vec![
            Column::new(
                DEVELOPER.into(),
                rows.iter().map(|r| r.0.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                TOTAL_REVIEWS.into(),
                rows.iter().map(|r| r.1).collect::<Vec<f64>>(),
            ),
        ])?;
        Ok(df)
    }

    fn count_mean_by(
        &self,
        key: &str,
        value: &str,
    ) -> Result<BTreeMap<String, CountMean>, ComputationError> {
        let keys = string_values(self.df, key)?;
        let values = float_values(self.df, value)?;

        let mut groups: BTreeMap<String, CountMean> = BTreeMap::new();
        for (k, v) in keys.into_iter().zip(values) {
            let Some(k) = k else { continue };
            let entry = groups.entry(k).or_default();
            entry.count += 1;
            entry.mean.push(v);
        }
        Ok(groups)
    }
}

/// Calendar year of every `Released` value; null dates stay `None`.
pub fn release_years(df: &DataFrame) -> Result<Vec<Option<i32>>, ComputationError> {
    string_values(df, RELEASED)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| match value {
            None => Ok(None),
            Some(text) => parse_year(&text)
                .map(Some)
                .ok_or(ComputationError::InvalidDate { row, value: text }),
        })
        .collect()
}

/// Year of a timestamp or date in one of the accepted text layouts.
pub fn parse_year(text: &str) -> Option<i32> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.year());
    }
    for layout in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, layout) {
            return Some(dt.year());
        }
    }
    for layout in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, layout) {
            return Some(date.year());
        }
    }
    None
}

fn app_type_label(flag: i32) -> &'static str {
    if flag == 1 {
        "Free"
    } else {
        "Paid"
    }
}

fn percentage(part: usize, total: usize, genre: &str) -> Result<f64, ComputationError> {
    if total == 0 {
        return Err(ComputationError::ZeroDivision {
            context: format!("percentage of paid apps in {genre}"),
        });
    }
    Ok(part as f64 * 100.0 / total as f64)
}

/// Key with the largest count; the smallest key wins a tie.
fn argmax(counts: &BTreeMap<String, usize>) -> Option<(&String, usize)> {
    counts
        .iter()
        .fold(None, |best: Option<(&String, usize)>, (k, &n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((k, n)),
        })
}

/// First `n` entries ordered by `cmp`, ties kept in ascending key order.
fn top_n<V>(
    groups: BTreeMap<String, V>,
    n: usize,
    cmp: impl Fn(&V, &V) -> Ordering,
) -> Vec<(String, V)> {
    let mut rows: Vec<(String, V)> = groups.into_iter().collect();
    rows.sort_by(|a, b| cmp(&a.1, &b.1));
    rows.truncate(n);
    rows
}

fn counts(values: impl IntoIterator<Item = usize>) -> Vec<u32> {
    values
        .into_iter()
        .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
        .collect()
}
