//! Table command implementation.
//!
//! Builds the pivot of runtime and memory at one sequence length and writes
//! `table.csv`, `speedup` and `summary.json` to the results directory.

use super::models::TableArgs;
use crate::aggregator::summary::{build_summary, Summary};
use crate::output::{write_speedup, write_summary, write_summary_csv, SummaryReport};
use crate::parser::table::read_benchmarks;
use anyhow::{Context, Result};
use colored::*;
use log::info;
use prettytable::{Cell, Row, Table};
use std::path::PathBuf;

/// Execute the table command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The computed summary
pub fn execute_table(args: TableArgs) -> Result<Summary> {
    info!("Summarising: {}", args.input.display());

    // Step 1: Read table
    info!("Step 1/3: Reading benchmarks...");
    let table = read_benchmarks(&args.input)
        .with_context(|| format!("Failed to read benchmarks from {}", args.input.display()))?;

    // Step 2: Pivot successful runs
    info!("Step 2/3: Building summary...");
    let summary = build_summary(&table.successful(), &args.summary)
        .context("Failed to build summary table")?;

    // Step 3: Write outputs
    info!("Step 3/3: Writing results...");
    let csv_path = args.out_dir.join("table.csv");
    write_summary_csv(&summary, &csv_path).context("Failed to write table.csv")?;

    let speedup_path = args.out_dir.join("speedup");
    write_speedup(&summary, &speedup_path).context("Failed to write speedup report")?;

    let json_path: PathBuf = args.out_dir.join("summary.json");
    let report = SummaryReport::new(&summary, args.input.display().to_string())
        .context("Failed to serialize summary")?;
    write_summary(&report, &json_path).context("Failed to write summary.json")?;

    info!("✓ Results written to: {}", args.out_dir.display());

    if args.print_summary {
        print_summary(&summary);
    }

    Ok(summary)
}

fn cell(value: Option<f64>, precision: usize) -> Cell {
    match value {
        Some(v) => Cell::new(&format!("{:.*}", precision, v)),
        None => Cell::new("-"),
    }
}

/// Print the pivot and speedups to stdout
///
/// **Private** - internal helper for execute_table
fn print_summary(summary: &Summary) {
    let mut table = Table::new();

    let mut header = vec![Cell::new("Algorithm")];
    header.extend(
        summary
            .error_rates
            .iter()
            .map(|e| Cell::new(&format!("s/pair @ {:.0}%", 100.0 * e))),
    );
    header.extend(
        summary
            .error_rates
            .iter()
            .map(|e| Cell::new(&format!("MB @ {:.0}%", 100.0 * e))),
    );
    table.add_row(Row::new(header));

    for row in &summary.rows {
        let mut cells = vec![Cell::new(&row.algorithm)];
        cells.extend(row.time_per_unit.iter().map(|v| cell(*v, 3)));
        cells.extend(row.memory_mb.iter().map(|v| cell(*v, 1)));
        table.add_row(Row::new(cells));
    }

    println!(
        "\n{}",
        format!("Summary at sequence length {}", summary.sequence_length).bold()
    );
    table.printstd();

    println!();
    for line in summary.speedup_text().lines() {
        println!("{}", line.cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::summary::SummaryConfig;

    #[test]
    fn test_execute_table_writes_results() {
        let temp_dir = tempfile::tempdir().unwrap();
        let input = temp_dir.path().join("tools_N1e7.tsv");
        std::fs::write(
            &input,
            "alg\tn\te\ts\tnr\tmax_uss\texit_status\n\
             edlib\t1000\t0.05\t10\t1\t100\tok\n\
             csh\t1000\t0.05\t2\t1\t200\tok\n\
             csh\t1000\t0.05\t50\t1\t200\ttimeout\n",
        )
        .unwrap();

        let args = TableArgs {
            input,
            summary: SummaryConfig {
                sequence_length: 1000,
                ..Default::default()
            },
            out_dir: temp_dir.path().join("results"),
            print_summary: true,
        };

        let summary = execute_table(args).unwrap();
        assert_eq!(summary.speedups[0].speedup, Some(5.0));

        let results = temp_dir.path().join("results");
        assert!(results.join("table.csv").exists());
        assert!(results.join("summary.json").exists());
        let speedup = std::fs::read_to_string(results.join("speedup")).unwrap();
        assert_eq!(speedup, "Speedup at n = 10^3:\nSpeedup at 0.05: 5.0\n");
    }
}
