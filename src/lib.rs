//! benchplot
//!
//! Scaling charts and summary tables for pairwise alignment benchmarks.
//!
//! This crate provides the core implementation for the
//! `benchplot` CLI tool: it reads benchmark TSV tables, derives
//! per-pair metrics, groups runs into series, fits power-law trends and
//! renders annotated SVG charts.
//!
//! ## Getting Started
//!
//! ```bash
//! benchplot plot table/scaling_n.tsv --x n --y s_per_pair --xlog --ylog \
//!     --group-by alg,r --trend-line --cone csh --cone-x 100
//! benchplot table table/tools_N1e7.tsv --summary
//! ```

pub mod aggregator;
pub mod chart;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
