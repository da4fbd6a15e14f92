//! benchplot CLI
//!
//! Scaling charts and summary tables for pairwise alignment benchmarks.
//! Reads the TSV tables written by the benchmark harness.

use anyhow::{Context, Result};
use benchplot::aggregator::grouping::Grouping;
use benchplot::aggregator::summary::SummaryConfig;
use benchplot::chart::cone::ConeSpec;
use benchplot::chart::layout::{ChartSpec, Threshold};
use benchplot::chart::trend::FitThresholds;
use benchplot::commands::{
    display_version, execute_figures, execute_plot, execute_table, validate_benchmark_file,
    PlotArgs, TableArgs,
};
use benchplot::parser::schema::Field;
use benchplot::utils::config::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

/// benchplot - scaling charts for alignment benchmarks
#[derive(Parser, Debug)]
#[command(name = "benchplot")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a scaling chart from a benchmark table
    Plot(PlotCommand),

    /// Render every figure listed in a TOML manifest
    Figures {
        /// Path to the manifest
        manifest: PathBuf,

        /// Output directory (overrides the manifest)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Pivot runtime and memory at one sequence length
    Table {
        /// Benchmark TSV
        input: PathBuf,

        /// Sequence length of the pivot
        #[arg(long, default_value = "10000000")]
        length: u64,

        /// Row order (algorithms not listed are left out)
        #[arg(long, value_delimiter = ',', default_value = "edlib,biwfa,sh,csh")]
        order: Vec<String>,

        /// Our algorithms (speedup denominator)
        #[arg(long, value_delimiter = ',', default_value = "sh,csh")]
        ours: Vec<String>,

        /// Competing algorithms (speedup numerator)
        #[arg(long, value_delimiter = ',', default_value = "edlib,biwfa")]
        theirs: Vec<String>,

        /// Output directory
        #[arg(long, default_value = "results")]
        out_dir: PathBuf,

        /// Print the table to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Check a benchmark table and list what can be plotted
    Validate {
        /// Benchmark TSV
        file: PathBuf,
    },

    /// Display version information
    Version,
}

#[derive(Args, Debug)]
struct PlotCommand {
    /// Benchmark TSV
    input: PathBuf,

    /// Field on the x axis (column or metric name)
    #[arg(long, default_value = "n")]
    x: Field,

    /// Field on the y axis
    #[arg(long, default_value = "s_per_pair")]
    y: Field,

    /// Logarithmic x axis
    #[arg(long)]
    xlog: bool,

    /// Logarithmic y axis
    #[arg(long)]
    ylog: bool,

    /// Series grouping: alg, alg,r or alg,r,k
    #[arg(long, default_value = "alg")]
    group_by: Grouping,

    /// Fit and draw y ~ x^a per series
    #[arg(long)]
    trend_line: bool,

    /// Minimum x used for fitting
    #[arg(long)]
    fit_min: Option<f64>,

    /// Per-algorithm minimum x, e.g. sh=1000
    #[arg(long, value_name = "ALG=X")]
    fit_min_for: Vec<String>,

    /// Algorithm anchoring the growth cone
    #[arg(long)]
    cone: Option<String>,

    /// Variant rank of the cone's reference series
    #[arg(long)]
    cone_rank: Option<i64>,

    /// Anchor x of the cone
    #[arg(long, default_value = "10000")]
    cone_x: f64,

    /// Right end of the cone (default: 3x the largest x)
    #[arg(long)]
    cone_x_max: Option<f64>,

    /// Draw a legend instead of labels next to the series
    #[arg(long)]
    legend: bool,

    /// Chart title
    #[arg(long)]
    title: Option<String>,

    /// Horizontal reference line at this y
    #[arg(long)]
    threshold: Option<f64>,

    /// Tick label of the reference line
    #[arg(long, default_value = "limit")]
    threshold_label: String,

    /// Explicit x ticks
    #[arg(long, value_delimiter = ',')]
    x_ticks: Option<Vec<f64>>,

    /// Explicit y ticks
    #[arg(long, value_delimiter = ',')]
    y_ticks: Option<Vec<f64>>,

    /// x axis margin (log: factor, linear: fraction of range)
    #[arg(long)]
    x_margin: Option<f64>,

    /// y axis margin (log: factor, linear: fraction of range)
    #[arg(long)]
    y_margin: Option<f64>,

    #[arg(long)]
    x_min: Option<f64>,

    #[arg(long)]
    x_max: Option<f64>,

    #[arg(long)]
    y_min: Option<f64>,

    #[arg(long)]
    y_max: Option<f64>,

    /// Join the points of each series
    #[arg(long)]
    connect: bool,

    /// One chart per error rate
    #[arg(long)]
    split_by_error_rate: bool,

    /// Ignore shorter sequences
    #[arg(long)]
    min_length: Option<u64>,

    /// Output name without extension
    #[arg(long, default_value = "scaling")]
    filename: String,

    /// Output directory
    #[arg(long, default_value = "imgs")]
    out_dir: PathBuf,

    /// Style table (TOML)
    #[arg(long)]
    styles: Option<PathBuf>,

    /// Chart width in pixels
    #[arg(long, default_value_t = DEFAULT_CHART_WIDTH)]
    width: usize,

    /// Chart height in pixels
    #[arg(long, default_value_t = DEFAULT_CHART_HEIGHT)]
    height: usize,
}

impl PlotCommand {
    fn into_args(self) -> Result<PlotArgs> {
        let mut fit_min = FitThresholds {
            default: self.fit_min,
            ..Default::default()
        };
        for entry in &self.fit_min_for {
            let (algorithm, x) = entry
                .split_once('=')
                .with_context(|| format!("Expected ALG=X, got '{}'", entry))?;
            let x: f64 = x
                .trim()
                .parse()
                .with_context(|| format!("Invalid minimum x in '{}'", entry))?;
            fit_min.per_algorithm.insert(algorithm.trim().to_string(), x);
        }

        let cone = self.cone.map(|reference| ConeSpec {
            reference,
            rank: self.cone_rank,
            x: self.cone_x,
            x_max: self.cone_x_max,
        });

        let threshold = self.threshold.map(|value| Threshold {
            value,
            label: self.threshold_label.clone(),
        });

        let chart = ChartSpec {
            x: self.x,
            y: self.y,
            xlog: self.xlog,
            ylog: self.ylog,
            group_by: self.group_by,
            trend_line: self.trend_line,
            fit_min,
            cone,
            x_margin: self.x_margin,
            y_margin: self.y_margin,
            x_min: self.x_min,
            x_max: self.x_max,
            y_min: self.y_min,
            y_max: self.y_max,
            x_ticks: self.x_ticks,
            y_ticks: self.y_ticks,
            legend: self.legend,
            title: self.title,
            threshold,
            connect: self.connect,
            filename: self.filename,
            width: self.width,
            height: self.height,
        };

        Ok(PlotArgs {
            input: self.input,
            chart,
            out_dir: self.out_dir,
            styles: self.styles,
            split_by_error_rate: self.split_by_error_rate,
            min_length: self.min_length,
        })
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Plot(command) => {
            let args = command.into_args()?;
            execute_plot(args)?;
        }

        Commands::Figures { manifest, out_dir } => {
            execute_figures(&manifest, out_dir)?;
        }

        Commands::Table {
            input,
            length,
            order,
            ours,
            theirs,
            out_dir,
            summary,
        } => {
            let args = TableArgs {
                input,
                summary: SummaryConfig {
                    sequence_length: length,
                    order,
                    ours,
                    theirs,
                },
                out_dir,
                print_summary: summary,
            };
            execute_table(args)?;
        }

        Commands::Validate { file } => {
            validate_benchmark_file(&file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
