//! Statistics Calculator Module
//! Descriptive statistics over plain value slices.

use serde::Serialize;
use statrs::statistics::Statistics;

/// Summary of one numeric column (the `describe()` view).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    fn empty(column: &str) -> Self {
        Self {
            column: column.to_string(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    ///
    /// `std` is the sample standard deviation; it is NaN for a single value.
    pub fn describe(column: &str, values: &[f64]) -> NumericSummary {
        let n = values.len();
        if n == 0 {
            return NumericSummary::empty(column);
        }

        let sorted = Self::sorted(values);

        NumericSummary {
            column: column.to_string(),
            count: n,
            mean: values.mean(),
            std: values.std_dev(),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Median of the values, `None` when there are none.
    pub fn median(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(Self::percentile(&Self::sorted(values), 50.0))
    }

    /// Arithmetic mean, `None` when there are no values.
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(values.mean())
        }
    }

    fn sorted(values: &[f64]) -> Vec<f64> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        sorted
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Equal-width histogram of `values` over `[min, max]`.
    ///
    /// Returns `(bin_start, bin_end, count)` triples. The last bin is closed
    /// on the right so the maximum lands in it.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let min = values.min();
        let max = values.max();
        if min == max {
            return vec![(min, max, values.len())];
        }

        let width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                let start = min + i as f64 * width;
                let end = if i + 1 == bins { max } else { start + width };
                (start, end, count)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_even_and_odd() {
        assert_eq!(StatsCalculator::median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(StatsCalculator::median(&[4.0, 1.0, 2.0, 3.0]), Some(2.5));
        assert_eq!(StatsCalculator::median(&[]), None);
    }

    #[test]
    fn describe_matches_linear_quartiles() {
        let s = StatsCalculator::describe("x", &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.count, 4);
        assert!((s.mean - 2.5).abs() < 1e-12);
        assert!((s.std - 1.290_994_448_735_805_6).abs() < 1e-9);
        assert_eq!(s.min, 1.0);
        assert!((s.q25 - 1.75).abs() < 1e-12);
        assert!((s.median - 2.5).abs() < 1e-12);
        assert!((s.q75 - 3.25).abs() < 1e-12);
        assert_eq!(s.max, 4.0);
    }

    #[test]
    fn describe_empty_is_nan() {
        let s = StatsCalculator::describe("x", &[]);
        assert_eq!(s.count, 0);
        assert!(s.mean.is_nan());
    }

    #[test]
    fn histogram_puts_max_in_last_bin() {
        let bins = StatsCalculator::histogram(&[0.0, 1.0, 2.0, 10.0], 5);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].2, 2);
        assert_eq!(bins[1].2, 1);
        assert_eq!(bins[4].2, 1);
        assert_eq!(bins[4].1, 10.0);
        assert_eq!(bins.iter().map(|b| b.2).sum::<usize>(), 4);
    }

    #[test]
    fn histogram_single_value() {
        assert_eq!(StatsCalculator::histogram(&[2.0, 2.0], 10), vec![(2.0, 2.0, 2)]);
    }
}
