//! Pivot table (CSV) and speedup report (text) writers.

use super::{file_size, prepare_output_path};
use crate::aggregator::summary::Summary;
use crate::utils::error::OutputError;
use log::info;
use std::fs;
use std::path::Path;

/// Header of the pivot: one column per quantity and error rate
fn header(summary: &Summary) -> Vec<String> {
    let mut header = vec!["algorithm".to_string()];
    for quantity in ["time_per_unit", "memory_mb"] {
        header.extend(
            summary
                .error_rates
                .iter()
                .map(|e| format!("{}_e{}", quantity, e)),
        );
    }
    header
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the pivot table as CSV
///
/// **Public** - writes `table.csv`
///
/// Missing cells are left empty.
///
/// # Errors
/// * `OutputError::TableFailed` - CSV writer error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_summary_csv(
    summary: &Summary,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing table to: {}", output_path.display());
    prepare_output_path(output_path)?;

    let mut wtr = csv::Writer::from_path(output_path)?;
    wtr.write_record(header(summary))?;
    for row in &summary.rows {
        let mut record = vec![row.algorithm.clone()];
        record.extend(row.time_per_unit.iter().map(|v| cell(*v)));
        record.extend(row.memory_mb.iter().map(|v| cell(*v)));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;

    info!(
        "Table written successfully ({} rows, {} bytes)",
        summary.rows.len(),
        file_size(output_path)
    );
    Ok(())
}

/// Write the speedup report as plain text
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_speedup(summary: &Summary, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    prepare_output_path(output_path)?;
    fs::write(output_path, summary.speedup_text())?;

    info!("Speedups written to: {}", output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::summary::{Speedup, SummaryRow};
    use pretty_assertions::assert_eq;

    fn summary() -> Summary {
        Summary {
            sequence_length: 10_000_000,
            error_rates: vec![0.01, 0.05],
            rows: vec![
                SummaryRow {
                    algorithm: "edlib".to_string(),
                    time_per_unit: vec![Some(12.5), None],
                    memory_mb: vec![Some(40.0), None],
                },
                SummaryRow {
                    algorithm: "csh".to_string(),
                    time_per_unit: vec![Some(0.5), Some(1.25)],
                    memory_mb: vec![Some(300.0), Some(310.5)],
                },
            ],
            speedups: vec![
                Speedup {
                    error_rate: 0.01,
                    ours: Some(0.5),
                    theirs: Some(12.5),
                    speedup: Some(25.0),
                },
                Speedup {
                    error_rate: 0.05,
                    ours: Some(1.25),
                    theirs: None,
                    speedup: None,
                },
            ],
        }
    }

    #[test]
    fn test_write_summary_csv() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("results/table.csv");

        write_summary_csv(&summary(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "algorithm,time_per_unit_e0.01,time_per_unit_e0.05,memory_mb_e0.01,memory_mb_e0.05\n\
             edlib,12.5,,40,\n\
             csh,0.5,1.25,300,310.5\n"
        );
    }

    #[test]
    fn test_write_speedup() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("speedup");

        write_speedup(&summary(), &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Speedup at n = 10^7:\nSpeedup at 0.01: 25.0\nSpeedup at 0.05: n/a\n"
        );
    }
}
