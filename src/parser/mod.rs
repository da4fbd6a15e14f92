//! Benchmark table parsing and schema definitions.
//!
//! This module handles:
//! - Mapping TSV headers (and their harness aliases) to columns
//! - Parsing cells into typed benchmark records
//! - Naming derived metrics and plottable fields

pub mod schema;
pub mod table;

// Re-export main types
pub use schema::{BenchmarkRecord, Column, Counters, ExitStatus, Field, Metric};
pub use table::{parse_benchmarks, read_benchmarks, BenchmarkTable};
