use crate::aggregator::metrics::available_metrics;
use crate::chart::style::{builtin_styles, load_styles, StyleTable};
use crate::parser::table::read_benchmarks;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use colored::*;
use log::info;
use std::borrow::Cow;
use std::path::Path;

/// Style table from `path`, or the built-in one
pub fn resolve_styles(path: Option<&Path>) -> Result<Cow<'static, StyleTable>> {
    match path {
        Some(path) => {
            info!("Loading styles from: {}", path.display());
            let styles = load_styles(path)
                .with_context(|| format!("Failed to load styles from {}", path.display()))?;
            Ok(Cow::Owned(styles))
        }
        None => Ok(Cow::Borrowed(builtin_styles())),
    }
}

/// Validate a benchmark TSV and describe what can be plotted from it
pub fn validate_benchmark_file(file_path: &Path) -> Result<()> {
    println!("Validating benchmarks: {}", file_path.display());

    let table = read_benchmarks(file_path)
        .with_context(|| format!("Failed to read benchmarks from {}", file_path.display()))?;
    let successful = table.successful().len();
    let failed = table.len() - successful;

    println!("{} Valid benchmark table", "✓".green());
    println!("  Rows:       {}", table.len());
    println!("  Successful: {}", successful.to_string().green());
    if failed > 0 {
        println!("  Failed:     {}", failed.to_string().red());
    } else {
        println!("  Failed:     0");
    }

    let columns: Vec<&str> = table.columns().iter().map(|c| c.name()).collect();
    println!("  Columns:    {}", columns.join(", "));

    let metrics: Vec<&str> = available_metrics(&table).iter().map(|m| m.name()).collect();
    if metrics.is_empty() {
        println!("  Metrics:    {}", "none derivable".yellow());
    } else {
        println!("  Metrics:    {}", metrics.join(", "));
    }

    let error_rates: Vec<String> = table.error_rates().iter().map(|e| e.to_string()).collect();
    if !error_rates.is_empty() {
        println!("  Error rates: {}", error_rates.join(", "));
    }

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("benchplot v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Scaling charts and summary tables for pairwise alignment benchmarks.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_builtin_styles() {
        let styles = resolve_styles(None).unwrap();
        assert!(matches!(styles, Cow::Borrowed(_)));
        assert_eq!(styles.color("csh"), "#317D32");
    }

    #[test]
    fn test_resolve_missing_styles_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("styles.toml");
        assert!(resolve_styles(Some(&missing)).is_err());
    }

    #[test]
    fn test_validate_benchmark_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("scaling_n.tsv");
        std::fs::write(&path, "alg\tn\ts\tnr\texit_status\nsh\t1000\t1\t1\tok\n").unwrap();

        assert!(validate_benchmark_file(&path).is_ok());
        assert!(validate_benchmark_file(&temp_dir.path().join("nope.tsv")).is_err());
    }
}
