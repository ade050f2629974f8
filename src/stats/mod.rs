//! Stats module - profiling, descriptive statistics and aggregation

pub mod aggregator;
pub mod calculator;
pub mod profiler;

pub use aggregator::{AnalysisResults, Aggregator, ComputationError};
pub use calculator::{NumericSummary, StatsCalculator};
pub use profiler::{Profiler, TableProfile};
