//! Figures command implementation.
//!
//! Renders every `[[figure]]` of a TOML manifest. Each entry takes the same
//! options as the plot command plus its `input` table; relative paths are
//! resolved against the manifest's directory.

use super::models::{FigureEntry, FigureManifest, PlotArgs};
use super::plot::{render_charts, select_rows};
use super::utils::resolve_styles;
use crate::output::{chart_path, write_svg};
use crate::parser::table::read_benchmarks;
use crate::utils::config::DEFAULT_CHART_DIR;
use crate::utils::error::ConfigurationError;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Parse a figure manifest
///
/// # Errors
/// * `ConfigurationError::IoError` - file cannot be read
/// * `ConfigurationError::TomlParseFailed` - invalid TOML or unknown field names
/// * `ConfigurationError::InvalidOption` - a `[[figure]]` entry has an unknown key
pub fn load_manifest(path: impl AsRef<Path>) -> Result<FigureManifest, ConfigurationError> {
    let contents = fs::read_to_string(path)?;
    let raw: toml::Value = toml::from_str(&contents)?;
    check_figure_keys(&raw)?;
    let manifest: FigureManifest = toml::from_str(&contents)?;
    Ok(manifest)
}

/// Entries flatten the chart options, so serde cannot reject unknown keys there
fn check_figure_keys(raw: &toml::Value) -> Result<(), ConfigurationError> {
    let Some(figures) = raw.get("figure").and_then(toml::Value::as_array) else {
        return Ok(());
    };
    for (i, figure) in figures.iter().enumerate() {
        let Some(entry) = figure.as_table() else {
            continue;
        };
        if let Some(key) = entry.keys().find(|k| !FigureEntry::accepts(k)) {
            return Err(ConfigurationError::InvalidOption(format!(
                "unknown key '{}' in figure {}",
                key,
                i + 1
            )));
        }
    }
    Ok(())
}

/// Execute the figures command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `manifest_path` - TOML manifest
/// * `out_dir` - Overrides the manifest's output directory
///
/// # Returns
/// Paths of all written charts
pub fn execute_figures(manifest_path: &Path, out_dir: Option<PathBuf>) -> Result<Vec<PathBuf>> {
    let manifest = load_manifest(manifest_path)
        .with_context(|| format!("Failed to load manifest {}", manifest_path.display()))?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new(""));

    let out_dir = out_dir
        .or_else(|| manifest.out_dir.as_ref().map(|d| base.join(d)))
        .unwrap_or_else(|| base.join(DEFAULT_CHART_DIR));
    let styles_path = manifest.styles.as_ref().map(|s| base.join(s));
    let styles = resolve_styles(styles_path.as_deref())?;

    info!(
        "Rendering {} figure(s) from {}",
        manifest.figures.len(),
        manifest_path.display()
    );

    let mut written = Vec::new();
    for (i, entry) in manifest.figures.iter().enumerate() {
        let args: PlotArgs = entry.to_plot_args(base, out_dir.clone(), styles_path.clone());
        info!(
            "Step {}/{}: {} from {}",
            i + 1,
            manifest.figures.len(),
            args.chart.filename,
            args.input.display()
        );

        let table = read_benchmarks(&args.input)
            .with_context(|| format!("Failed to read benchmarks from {}", args.input.display()))?;
        let table = select_rows(&table, &args);

        for report in render_charts(&table, &args, &styles)? {
            let path = chart_path(&out_dir, &report.filename);
            write_svg(&report.svg, &path)
                .with_context(|| format!("Failed to write chart {}", path.display()))?;
            info!("✓ Chart written to: {}", path.display());
            written.push(path);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::grouping::Grouping;
    use crate::parser::schema::{Field, Metric};

    const MANIFEST: &str = r#"
out_dir = "imgs"

[[figure]]
input = "table/tools.tsv"
x = "n"
y = "s_per_pair"
xlog = true
ylog = true
trend_line = true
split_by_error_rate = true
filename = "tools"

[[figure]]
input = "table/tools.tsv"
x = "e_pct"
y = "s_per_pair"
group_by = ["alg", "r"]
connect = true
filename = "scaling_e"
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest: FigureManifest = toml::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.figures.len(), 2);

        let first = &manifest.figures[0];
        assert!(first.split_by_error_rate);
        assert!(first.chart.trend_line);
        assert_eq!(first.chart.y, Field::Derived(Metric::TimePerUnit));

        let second = &manifest.figures[1];
        assert_eq!(second.chart.group_by, Grouping::AlgorithmRank);
        assert_eq!(second.chart.x, Field::Derived(Metric::ErrorRatePct));
    }

    #[test]
    fn test_misspelt_figure_key_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("figures.toml");
        fs::write(
            &path,
            "[[figure]]\ninput = \"tools.tsv\"\nx = \"n\"\ntrendline = true\n",
        )
        .unwrap();

        let err = load_manifest(&path).unwrap_err();
        assert!(
            matches!(err, ConfigurationError::InvalidOption(ref msg) if msg.contains("trendline"))
        );
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("figures.toml");
        fs::write(&path, "outdir = \"imgs\"\n").unwrap();

        assert!(matches!(
            load_manifest(&path),
            Err(ConfigurationError::TomlParseFailed(_))
        ));
    }

    #[test]
    fn test_manifest_accepts_every_chart_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("figures.toml");
        fs::write(&path, MANIFEST).unwrap();
        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.figures.len(), 2);
    }

    #[test]
    fn test_execute_figures() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp_dir.path().join("table")).unwrap();
        fs::write(
            temp_dir.path().join("table/tools.tsv"),
            "alg\tr\tn\te\ts\tnr\texit_status\n\
             sh\t1\t1000\t0.01\t1\t1\tok\n\
             sh\t1\t10000\t0.01\t10\t1\tok\n\
             sh\t1\t1000\t0.05\t2\t1\tok\n\
             sh\t1\t10000\t0.05\t20\t1\tok\n",
        )
        .unwrap();
        let manifest_path = temp_dir.path().join("figures.toml");
        fs::write(&manifest_path, MANIFEST).unwrap();

        let written = execute_figures(&manifest_path, None).unwrap();

        let names: Vec<String> = written
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["tools_e0.01.svg", "tools_e0.05.svg", "scaling_e.svg"]);
        assert!(written.iter().all(|p| p.starts_with(temp_dir.path().join("imgs"))));
    }
}
