//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while reading a benchmark table
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read TSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Invalid value '{value}' in column '{column}' (line {line})")]
    InvalidValue {
        column: String,
        line: u64,
        value: String,
    },
}

/// A requested derived metric needs a source column the table does not have
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Metric '{metric}' requires column '{column}', which is not in the table")]
pub struct SchemaError {
    pub metric: String,
    pub column: String,
}

/// Errors caused by an unsupported or malformed chart/table configuration
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Unsupported grouping: [{0}] (expected alg, alg+r or alg+r+k)")]
    UnsupportedGrouping(String),

    #[error("Unrecognized column: {0}")]
    UnknownField(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("TOML parse error: {0}")]
    TomlParseFailed(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors raised when the cone anchor cannot be resolved
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("Reference group '{0}' not present in the data")]
    UnknownGroup(String),

    #[error("Reference group '{group}' has no data point at x = {x}")]
    NoAnchorPoint { group: String, x: f64 },
}

/// Errors that can occur while building a chart
#[derive(Error, Debug)]
pub enum ChartError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("No plottable data for {x} vs {y}")]
    EmptyData { x: String, y: String },
}

/// Errors that can occur while building summary tables
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("No successful runs at sequence length {0}")]
    NoRows(u64),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write table: {0}")]
    TableFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
