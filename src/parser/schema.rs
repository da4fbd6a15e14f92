//! Column, metric and record definitions for benchmark tables.
//!
//! Raw columns are what the benchmark harness writes; derived metrics are
//! computed from them by `aggregator::metrics`. A `Field` names either one,
//! and is what charts and tables refer to.

use crate::utils::config::*;
use crate::utils::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A raw column of the benchmark TSV
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Algorithm,
    VariantRank,
    MaxMatchCost,
    K,
    SequenceLength,
    ErrorRate,
    ElapsedSeconds,
    PairCount,
    TrialCount,
    PeakMemoryKb,
    ExitStatus,
    StatesExpanded,
    StatesExplored,
    PrecomputeTime,
    AlignTime,
    PruneTime,
    HeuristicValue,
    EditDistance,
}

impl Column {
    pub const ALL: [Column; 18] = [
        Column::Algorithm,
        Column::VariantRank,
        Column::MaxMatchCost,
        Column::K,
        Column::SequenceLength,
        Column::ErrorRate,
        Column::ElapsedSeconds,
        Column::PairCount,
        Column::TrialCount,
        Column::PeakMemoryKb,
        Column::ExitStatus,
        Column::StatesExpanded,
        Column::StatesExplored,
        Column::PrecomputeTime,
        Column::AlignTime,
        Column::PruneTime,
        Column::HeuristicValue,
        Column::EditDistance,
    ];

    /// Accepted header names; the first one is canonical
    pub fn header_names(self) -> &'static [&'static str] {
        match self {
            Column::Algorithm => ALGORITHM_COLUMN_NAMES,
            Column::VariantRank => VARIANT_RANK_COLUMN_NAMES,
            Column::MaxMatchCost => MAX_MATCH_COST_COLUMN_NAMES,
            Column::K => K_COLUMN_NAMES,
            Column::SequenceLength => SEQUENCE_LENGTH_COLUMN_NAMES,
            Column::ErrorRate => ERROR_RATE_COLUMN_NAMES,
            Column::ElapsedSeconds => ELAPSED_COLUMN_NAMES,
            Column::PairCount => PAIR_COUNT_COLUMN_NAMES,
            Column::TrialCount => TRIAL_COUNT_COLUMN_NAMES,
            Column::PeakMemoryKb => PEAK_MEMORY_COLUMN_NAMES,
            Column::ExitStatus => EXIT_STATUS_COLUMN_NAMES,
            Column::StatesExpanded => STATES_EXPANDED_COLUMN_NAMES,
            Column::StatesExplored => STATES_EXPLORED_COLUMN_NAMES,
            Column::PrecomputeTime => PRECOMPUTE_TIME_COLUMN_NAMES,
            Column::AlignTime => ALIGN_TIME_COLUMN_NAMES,
            Column::PruneTime => PRUNE_TIME_COLUMN_NAMES,
            Column::HeuristicValue => HEURISTIC_VALUE_COLUMN_NAMES,
            Column::EditDistance => EDIT_DISTANCE_COLUMN_NAMES,
        }
    }

    pub fn name(self) -> &'static str {
        self.header_names()[0]
    }

    /// Resolve a TSV header to a column
    pub fn from_header(header: &str) -> Option<Column> {
        let header = header.trim();
        Column::ALL
            .into_iter()
            .find(|column| column.header_names().contains(&header))
    }

    /// Whether the column can be used as a chart axis
    pub fn is_numeric(self) -> bool {
        !matches!(self, Column::Algorithm | Column::ExitStatus)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Column::Algorithm => "Algorithm",
            Column::VariantRank => "Variant rank",
            Column::MaxMatchCost => "Max match cost",
            Column::K => "Seed length k",
            Column::SequenceLength => "Sequence length [bp]",
            Column::ErrorRate => "Error rate",
            Column::ElapsedSeconds => "Runtime [s]",
            Column::PairCount => "Pairs",
            Column::TrialCount => "Trials",
            Column::PeakMemoryKb => "Memory [KB]",
            Column::ExitStatus => "Exit status",
            Column::StatesExpanded => "Expanded states",
            Column::StatesExplored => "Explored states",
            Column::PrecomputeTime => "Precomputation [s]",
            Column::AlignTime => "Alignment [s]",
            Column::PruneTime => "Pruning [s]",
            Column::HeuristicValue => "Initial heuristic",
            Column::EditDistance => "Edit distance",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A metric computed from raw columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    EffectiveCount,
    TimePerUnit,
    TimePerBase,
    ErrorRatePct,
    MemoryMb,
    AlignFraction,
    PruneFraction,
    HeuristicAccuracy,
    ExpansionEfficiency,
    Band,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::EffectiveCount,
        Metric::TimePerUnit,
        Metric::TimePerBase,
        Metric::ErrorRatePct,
        Metric::MemoryMb,
        Metric::AlignFraction,
        Metric::PruneFraction,
        Metric::HeuristicAccuracy,
        Metric::ExpansionEfficiency,
        Metric::Band,
    ];

    /// Accepted names; the first one is canonical
    pub fn names(self) -> &'static [&'static str] {
        match self {
            Metric::EffectiveCount => &["effective_count"],
            Metric::TimePerUnit => &["time_per_unit", "s_per_pair"],
            Metric::TimePerBase => &["time_per_base", "s_per_bp"],
            Metric::ErrorRatePct => &["error_rate_pct", "e_pct"],
            Metric::MemoryMb => &["memory_mb"],
            Metric::AlignFraction => &["align_fraction", "align_frac"],
            Metric::PruneFraction => &["prune_fraction", "prune_frac"],
            Metric::HeuristicAccuracy => &["heuristic_accuracy", "h_approx_frac"],
            Metric::ExpansionEfficiency => &["expansion_efficiency", "expanded_frac"],
            Metric::Band => &["band"],
        }
    }

    pub fn name(self) -> &'static str {
        self.names()[0]
    }

    pub fn from_name(name: &str) -> Option<Metric> {
        let name = name.trim();
        Metric::ALL.into_iter().find(|m| m.names().contains(&name))
    }

    /// Columns that must all exist for the metric to be computed.
    ///
    /// The pair/trial count is reported separately by `needs_count`, since
    /// either of two columns satisfies it.
    pub fn required_columns(self) -> &'static [Column] {
        match self {
            Metric::EffectiveCount => &[],
            Metric::TimePerUnit => &[Column::ElapsedSeconds],
            Metric::TimePerBase => &[Column::ElapsedSeconds, Column::SequenceLength],
            Metric::ErrorRatePct => &[Column::ErrorRate],
            Metric::MemoryMb => &[Column::PeakMemoryKb],
            Metric::AlignFraction => &[Column::PrecomputeTime, Column::AlignTime],
            Metric::PruneFraction => &[Column::PruneTime, Column::AlignTime],
            Metric::HeuristicAccuracy => &[Column::HeuristicValue, Column::EditDistance],
            Metric::ExpansionEfficiency => &[Column::StatesExpanded, Column::StatesExplored],
            Metric::Band => &[Column::StatesExpanded, Column::SequenceLength],
        }
    }

    pub fn needs_count(self) -> bool {
        matches!(
            self,
            Metric::EffectiveCount | Metric::TimePerUnit | Metric::TimePerBase
        )
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Metric::EffectiveCount => "Pairs",
            Metric::TimePerUnit => "Runtime [s]",
            Metric::TimePerBase => "Runtime per bp [s]",
            Metric::ErrorRatePct => "Error rate",
            Metric::MemoryMb => "Memory [MB]",
            Metric::AlignFraction => "Alignment fraction",
            Metric::PruneFraction => "Pruning fraction",
            Metric::HeuristicAccuracy => "Heuristic accuracy",
            Metric::ExpansionEfficiency => "Expanded / explored",
            Metric::Band => "Band",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A numeric quantity that can be plotted or tabulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Field {
    Raw(Column),
    Derived(Metric),
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Raw(column) => column.name(),
            Field::Derived(metric) => metric.name(),
        }
    }

    /// Axis label
    pub fn display_name(self) -> &'static str {
        match self {
            Field::Raw(column) => column.display_name(),
            Field::Derived(metric) => metric.display_name(),
        }
    }

    pub fn is_sequence_length(self) -> bool {
        self == Field::Raw(Column::SequenceLength)
    }

    pub fn is_error_rate_pct(self) -> bool {
        self == Field::Derived(Metric::ErrorRatePct)
    }

    pub fn metric(self) -> Option<Metric> {
        match self {
            Field::Derived(metric) => Some(metric),
            Field::Raw(_) => None,
        }
    }
}

impl FromStr for Field {
    type Err = ConfigurationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if let Some(metric) = Metric::from_name(name) {
            return Ok(Field::Derived(metric));
        }
        match Column::from_header(name) {
            Some(column) if column.is_numeric() => Ok(Field::Raw(column)),
            _ => Err(ConfigurationError::UnknownField(name.to_string())),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<String> for Field {
    type Error = ConfigurationError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.name().to_string()
    }
}

/// Outcome of one benchmark run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExitStatus {
    #[default]
    Ok,
    Failed(String),
}

impl ExitStatus {
    pub fn from_cell(cell: &str) -> Self {
        let cell = cell.trim();
        if SUCCESS_STATUS_VALUES.contains(&cell) {
            ExitStatus::Ok
        } else {
            ExitStatus::Failed(cell.to_string())
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExitStatus::Ok)
    }
}

/// Algorithm-internal counters reported by some aligners
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Counters {
    pub states_expanded: Option<f64>,
    pub states_explored: Option<f64>,
    pub precompute_time: Option<f64>,
    pub align_time: Option<f64>,
    pub prune_time: Option<f64>,
    pub heuristic_value: Option<f64>,
    pub edit_distance: Option<f64>,
}

/// One row of a benchmark table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkRecord {
    pub algorithm: String,
    pub variant_rank: Option<i64>,
    pub max_match_cost: Option<i64>,
    pub k: Option<i64>,
    pub sequence_length: Option<u64>,
    pub error_rate: Option<f64>,
    pub elapsed_seconds: Option<f64>,
    pub pair_count: Option<u64>,
    pub trial_count: Option<u64>,
    pub peak_memory_kb: Option<f64>,
    pub exit_status: ExitStatus,
    pub counters: Counters,
}

impl BenchmarkRecord {
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            ..Default::default()
        }
    }

    /// Numeric value of a raw column, if present
    pub fn raw(&self, column: Column) -> Option<f64> {
        match column {
            Column::Algorithm | Column::ExitStatus => None,
            Column::VariantRank => self.variant_rank.map(|v| v as f64),
            Column::MaxMatchCost => self.max_match_cost.map(|v| v as f64),
            Column::K => self.k.map(|v| v as f64),
            Column::SequenceLength => self.sequence_length.map(|v| v as f64),
            Column::ErrorRate => self.error_rate,
            Column::ElapsedSeconds => self.elapsed_seconds,
            Column::PairCount => self.pair_count.map(|v| v as f64),
            Column::TrialCount => self.trial_count.map(|v| v as f64),
            Column::PeakMemoryKb => self.peak_memory_kb,
            Column::StatesExpanded => self.counters.states_expanded,
            Column::StatesExplored => self.counters.states_explored,
            Column::PrecomputeTime => self.counters.precompute_time,
            Column::AlignTime => self.counters.align_time,
            Column::PruneTime => self.counters.prune_time,
            Column::HeuristicValue => self.counters.heuristic_value,
            Column::EditDistance => self.counters.edit_distance,
        }
    }
}
