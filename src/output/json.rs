//! JSON summary output.
//!
//! Wraps a `Summary` with a schema version and timestamp and writes it with
//! pretty formatting.

use super::{file_size, prepare_output_path};
use crate::aggregator::summary::Summary;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Stored form of a summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub version: String,
    pub generated_at: String,

    /// Benchmark table the summary was built from
    pub input: String,
    pub summary: serde_json::Value,
}

impl SummaryReport {
    /// Wrap `summary` with the current schema version and time
    pub fn new(summary: &Summary, input: impl Into<String>) -> Result<Self, OutputError> {
        Ok(Self {
            version: SCHEMA_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            input: input.into(),
            summary: serde_json::to_value(summary)?,
        })
    }
}

/// Write a summary report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_summary(
    report: &SummaryReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing summary to: {}", output_path.display());
    prepare_output_path(output_path)?;

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;

    info!(
        "Summary written successfully ({} bytes)",
        file_size(output_path)
    );
    Ok(())
}

/// Read a summary report back
///
/// **Public** - useful for validation and tests
pub fn read_summary(input_path: impl AsRef<Path>) -> Result<SummaryReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading summary from: {}", input_path.display());

    let file = File::open(input_path)?;
    let report: SummaryReport = serde_json::from_reader(file)?;

    debug!(
        "Summary loaded: version {}, generated {}",
        report.version, report.generated_at
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::summary::{Speedup, SummaryRow};
    use tempfile::NamedTempFile;

    fn create_test_summary() -> Summary {
        Summary {
            sequence_length: 10_000_000,
            error_rates: vec![0.05],
            rows: vec![SummaryRow {
                algorithm: "csh".to_string(),
                time_per_unit: vec![Some(1.5)],
                memory_mb: vec![None],
            }],
            speedups: vec![Speedup {
                error_rate: 0.05,
                ours: Some(1.5),
                theirs: Some(30.0),
                speedup: Some(20.0),
            }],
        }
    }

    #[test]
    fn test_write_and_read_summary() {
        let temp_file = NamedTempFile::new().unwrap();
        let report = SummaryReport::new(&create_test_summary(), "tools.tsv").unwrap();

        write_summary(&report, temp_file.path()).unwrap();
        let loaded = read_summary(temp_file.path()).unwrap();

        assert_eq!(loaded.version, SCHEMA_VERSION);
        assert_eq!(loaded.input, "tools.tsv");
        assert_eq!(loaded.summary["rows"][0]["algorithm"], "csh");
        assert!(loaded.summary["rows"][0]["memory_mb"][0].is_null());
        assert_eq!(loaded.summary["speedups"][0]["speedup"], 20.0);
    }
}
