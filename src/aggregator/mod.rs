//! Aggregation of benchmark rows into metrics, series and summaries.
//!
//! This module transforms parsed benchmark tables into:
//! - Derived metrics (runtime per pair, band, fractions, ...)
//! - Grouped (x, y) series per algorithm variant
//! - Pivot tables and speedups at a fixed sequence length

pub mod grouping;
pub mod metrics;
pub mod summary;

// Re-export main types and functions
pub use grouping::{group_series, sort_series, GroupKey, Grouping, Series};
pub use metrics::{available_metrics, derive_metrics};
pub use summary::{build_summary, Speedup, Summary, SummaryConfig, SummaryRow};
