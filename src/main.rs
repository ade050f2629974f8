//! App Store EDA - command line entry point.
//!
//! Runs the analysis over `appleAppData.csv` in the working directory and
//! prints the profile, the cleaning summary and every chart table.

use anyhow::{Context, Result};
use appstore_eda::config::CONFIG_FILE_NAME;
use appstore_eda::{AnalysisConfig, Pipeline, PipelineOutput};
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_output(output: &PipelineOutput) {
    let profile = &output.profile;

    println!("{}", profile.preview);
    println!("Columns:");
    for column in &profile.column_info {
        println!(
            "  {:<24} {:<10} {} non-null",
            column.name, column.dtype, column.non_null
        );
    }
    println!("Numeric summary:");
    for s in &profile.numeric {
        println!(
            "  {:<24} count={} mean={:.3} std={:.3} min={:.3} 25%={:.3} 50%={:.3} 75%={:.3} max={:.3}",
            s.column, s.count, s.mean, s.std, s.min, s.q25, s.median, s.q75, s.max
        );
    }
    println!("Shape: {:?}", profile.shape());
    println!("{}", profile.missing_values_report());

    let summary = &output.cleaned.summary;
    println!(
        "Cleaning: {} -> {} rows ({} missing name/date, {} duplicates), size median {}",
        summary.rows_before,
        summary.rows_after,
        summary.dropped_missing_keys,
        summary.duplicates_removed,
        summary.size_fill_value
    );
    println!("Remaining missing values:");
    for (column, count) in &output.remaining_nulls {
        println!("  {column}: {count}");
    }

    for chart in &output.charts {
        println!(
            "\n{} [{}: x={}, y={}{}]",
            chart.title,
            chart.kind,
            chart.x,
            chart.y,
            chart
                .hue
                .as_ref()
                .map(|h| format!(", hue={h}"))
                .unwrap_or_default()
        );
        println!("{}", chart.data);
    }
}

fn main() -> Result<()> {
    init_logging();

    let config = AnalysisConfig::load_or_default(Path::new(CONFIG_FILE_NAME))
        .context("Failed to load configuration")?;
    let pipeline = Pipeline::new(config)?;

    let output = pipeline
        .run()
        .with_context(|| format!("Analysis of {} failed", pipeline.config().input_path.display()))?;

    print_output(&output);
    info!(
        "Analysis complete, missing values summary at {}",
        pipeline.config().report_path.display()
    );
    Ok(())
}
