//! Output writers for charts and summaries.
//!
//! This module handles writing data to disk in various formats:
//! - SVG charts
//! - JSON summaries (pretty)
//! - CSV pivot tables and the plain-text speedup report

pub mod json;
pub mod svg;
pub mod table;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

// Re-export main functions
pub use json::{read_summary, write_summary, SummaryReport};
pub use svg::{chart_path, write_svg};
pub use table::{write_speedup, write_summary_csv};

/// Validate that output path is writable
///
/// **Private** - shared by every writer
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate `path` and create its parent directories
///
/// **Private** - internal helper for the writers
fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    validate_output_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

/// Size of a written file in bytes
fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_path_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            validate_output_path(temp_dir.path()),
            Err(OutputError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_prepare_creates_parents() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("a/b/out.svg");
        prepare_output_path(&nested).unwrap();
        assert!(nested.parent().unwrap().is_dir());
    }
}
