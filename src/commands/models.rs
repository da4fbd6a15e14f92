use crate::aggregator::summary::SummaryConfig;
use crate::chart::layout::ChartSpec;
use crate::utils::config::{DEFAULT_CHART_DIR, DEFAULT_RESULTS_DIR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Arguments for the plot command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, PartialEq)]
pub struct PlotArgs {
    /// Benchmark TSV
    pub input: PathBuf,

    /// Chart configuration
    pub chart: ChartSpec,

    /// Directory receiving `<filename>.svg`
    pub out_dir: PathBuf,

    /// Style table overriding the built-in colours and names
    pub styles: Option<PathBuf>,

    /// One chart per distinct error rate, named `<filename>_e<e>`
    pub split_by_error_rate: bool,

    /// Drop rows with a shorter sequence length
    pub min_length: Option<u64>,
}

impl Default for PlotArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            chart: ChartSpec::default(),
            out_dir: PathBuf::from(DEFAULT_CHART_DIR),
            styles: None,
            split_by_error_rate: false,
            min_length: None,
        }
    }
}

/// Arguments for the table command
#[derive(Debug, Clone, PartialEq)]
pub struct TableArgs {
    pub input: PathBuf,
    pub summary: SummaryConfig,

    /// Directory receiving table.csv, speedup and summary.json
    pub out_dir: PathBuf,

    /// Print the pivot to stdout
    pub print_summary: bool,
}

impl Default for TableArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            summary: SummaryConfig::default(),
            out_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            print_summary: false,
        }
    }
}

/// One `[[figure]]` entry of a figure manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureEntry {
    /// Benchmark TSV, relative to the manifest
    pub input: PathBuf,

    #[serde(default)]
    pub split_by_error_rate: bool,

    #[serde(default)]
    pub min_length: Option<u64>,

    #[serde(flatten)]
    pub chart: ChartSpec,
}

/// A TOML file listing every figure to render
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FigureManifest {
    #[serde(default)]
    pub out_dir: Option<PathBuf>,

    #[serde(default)]
    pub styles: Option<PathBuf>,

    #[serde(default, rename = "figure")]
    pub figures: Vec<FigureEntry>,
}

impl FigureEntry {
    /// Keys of an entry besides the chart options
    pub const KEYS: &'static [&'static str] = &["input", "split_by_error_rate", "min_length"];

    /// Whether `key` is a recognised entry key
    pub fn accepts(key: &str) -> bool {
        Self::KEYS.contains(&key) || ChartSpec::KEYS.contains(&key)
    }

    /// Plot arguments for this entry; relative paths resolve against `base`
    pub fn to_plot_args(&self, base: &Path, out_dir: PathBuf, styles: Option<PathBuf>) -> PlotArgs {
        PlotArgs {
            input: base.join(&self.input),
            chart: self.chart.clone(),
            out_dir,
            styles,
            split_by_error_rate: self.split_by_error_rate,
            min_length: self.min_length,
        }
    }
}
