//! Plot command implementation.
//!
//! The plot command:
//! 1. Reads the benchmark table
//! 2. Keeps successful runs (and long enough sequences)
//! 3. Renders one chart, or one per error rate
//! 4. Writes the SVG files

use super::models::PlotArgs;
use super::utils::resolve_styles;
use crate::chart::layout::{render_chart, ChartReport};
use crate::chart::style::StyleTable;
use crate::output::{chart_path, write_svg};
use crate::parser::table::{read_benchmarks, BenchmarkTable};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Execute the plot command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Paths of the written charts
///
/// # Errors
/// * Unreadable or malformed benchmark table
/// * Unknown fields, missing columns, cone lookup failures
/// * File write errors
pub fn execute_plot(args: PlotArgs) -> Result<Vec<PathBuf>> {
    let start_time = Instant::now();

    info!("Plotting {} from: {}", args.chart.filename, args.input.display());

    // Step 1: Read table
    info!("Step 1/4: Reading benchmarks...");
    let table = read_benchmarks(&args.input)
        .with_context(|| format!("Failed to read benchmarks from {}", args.input.display()))?;

    // Step 2: Filter rows
    info!("Step 2/4: Filtering runs...");
    let table = select_rows(&table, &args);

    let styles = resolve_styles(args.styles.as_deref())?;

    // Step 3: Render
    info!("Step 3/4: Rendering charts...");
    let reports = render_charts(&table, &args, &styles)?;

    // Step 4: Write
    info!("Step 4/4: Writing {} chart(s)...", reports.len());
    let mut written = Vec::with_capacity(reports.len());
    for report in &reports {
        let path = chart_path(&args.out_dir, &report.filename);
        write_svg(&report.svg, &path)
            .with_context(|| format!("Failed to write chart {}", path.display()))?;
        info!("✓ Chart written to: {}", path.display());
        written.push(path);
    }

    info!(
        "Plot completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(written)
}

/// Successful runs at or above the minimum length
///
/// **Public** - shared with the figures command
pub fn select_rows(table: &BenchmarkTable, args: &PlotArgs) -> BenchmarkTable {
    let total = table.len();
    let table = table.successful();
    if table.len() < total {
        info!("Dropped {} failed runs", total - table.len());
    }

    match args.min_length {
        Some(min) => {
            let kept = table.filter(|r| r.sequence_length.map_or(false, |n| n >= min));
            debug!(
                "Kept {} of {} rows with sequence length >= {}",
                kept.len(),
                table.len(),
                min
            );
            kept
        }
        None => table,
    }
}

/// Render the chart(s) described by `args` without writing them
///
/// **Public** - used by execute_plot and the figures command
pub fn render_charts(
    table: &BenchmarkTable,
    args: &PlotArgs,
    styles: &StyleTable,
) -> Result<Vec<ChartReport>> {
    if !args.split_by_error_rate {
        let report = render_chart(table, &args.chart, styles)
            .with_context(|| format!("Failed to render chart {}", args.chart.filename))?;
        return Ok(vec![report]);
    }

    let error_rates = table.error_rates();
    if error_rates.is_empty() {
        warn!("No error rates in table, rendering a single chart");
        let report = render_chart(table, &args.chart, styles)
            .with_context(|| format!("Failed to render chart {}", args.chart.filename))?;
        return Ok(vec![report]);
    }

    let mut reports = Vec::with_capacity(error_rates.len());
    for e in error_rates {
        let subset = table.filter(|r| r.error_rate == Some(e));
        let spec = args
            .chart
            .clone()
            .with_filename(format!("{}_e{}", args.chart.filename, e));
        debug!("Error rate {}: {} rows", e, subset.len());

        let report = render_chart(&subset, &spec, styles)
            .with_context(|| format!("Failed to render chart {}", spec.filename))?;
        reports.push(report);
    }
    Ok(reports)
}
