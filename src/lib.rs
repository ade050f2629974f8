//! App Store EDA - exploratory analysis of app store listings
//!
//! Loads the listing CSV, profiles it, cleans it and computes the grouped
//! tables behind the genre, pricing, rating, developer and yearly charts.

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod stats;

pub use config::AnalysisConfig;
pub use pipeline::{Pipeline, PipelineError, PipelineOutput};
