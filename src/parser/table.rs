//! Benchmark table reader.
//!
//! Reads the tab-separated tables written by the benchmark harness into a
//! `BenchmarkTable`. Unknown columns are ignored, missing cells become `None`.

use super::schema::{BenchmarkRecord, Column, ExitStatus, Field, Metric};
use crate::utils::config::MISSING_CELL_VALUES;
use crate::utils::error::ParseError;
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// An immutable set of benchmark records plus any derived metric columns
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkTable {
    records: Vec<BenchmarkRecord>,
    columns: BTreeSet<Column>,
    derived: BTreeMap<Metric, Vec<Option<f64>>>,
}

impl BenchmarkTable {
    /// Build a table from records; `columns` lists the raw columns present
    pub fn new(records: Vec<BenchmarkRecord>, columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            records,
            columns: columns.into_iter().collect(),
            derived: BTreeMap::new(),
        }
    }

    pub fn records(&self) -> &[BenchmarkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &BTreeSet<Column> {
        &self.columns
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn has_metric(&self, metric: Metric) -> bool {
        self.derived.contains_key(&metric)
    }

    /// Derived metrics present in the table
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.derived.keys().copied()
    }

    pub fn metric(&self, metric: Metric) -> Option<&[Option<f64>]> {
        self.derived.get(&metric).map(Vec::as_slice)
    }

    /// Whether a field can be read from this table
    pub fn has_field(&self, field: Field) -> bool {
        match field {
            Field::Raw(column) => self.has_column(column),
            Field::Derived(metric) => self.has_metric(metric),
        }
    }

    /// Value of `field` at `row`; `None` when missing or not finite
    pub fn value(&self, row: usize, field: Field) -> Option<f64> {
        let value = match field {
            Field::Raw(column) => self.records.get(row)?.raw(column),
            Field::Derived(metric) => *self.derived.get(&metric)?.get(row)?,
        };
        value.filter(|v| v.is_finite())
    }

    /// Rows matching `predicate`, derived columns kept aligned
    pub fn filter(&self, predicate: impl Fn(&BenchmarkRecord) -> bool) -> Self {
        let keep: Vec<bool> = self.records.iter().map(|r| predicate(r)).collect();

        let records = self
            .records
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(r, _)| r.clone())
            .collect();

        let derived = self
            .derived
            .iter()
            .map(|(metric, values)| {
                let values = values
                    .iter()
                    .zip(&keep)
                    .filter(|(_, k)| **k)
                    .map(|(v, _)| *v)
                    .collect();
                (*metric, values)
            })
            .collect();

        Self {
            records,
            columns: self.columns.clone(),
            derived,
        }
    }

    /// Only the runs whose exit status is a success
    pub fn successful(&self) -> Self {
        self.filter(|r| r.exit_status.is_success())
    }

    /// Distinct error rates in order of first appearance
    pub fn error_rates(&self) -> Vec<f64> {
        let mut rates: Vec<f64> = Vec::new();
        for rate in self.records.iter().filter_map(|r| r.error_rate) {
            if !rates.contains(&rate) {
                rates.push(rate);
            }
        }
        rates
    }

    /// Largest value of `field`, ignoring missing cells
    pub fn max(&self, field: Field) -> Option<f64> {
        (0..self.len())
            .filter_map(|row| self.value(row, field))
            .reduce(f64::max)
    }

    pub(crate) fn records_mut(&mut self) -> &mut [BenchmarkRecord] {
        &mut self.records
    }

    pub(crate) fn insert_column(&mut self, column: Column) {
        self.columns.insert(column);
    }

    pub(crate) fn set_metric(&mut self, metric: Metric, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.records.len());
        self.derived.insert(metric, values);
    }
}

/// Read a benchmark TSV from disk
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::Io` - file cannot be opened
/// * `ParseError::Csv` - malformed TSV (e.g. ragged rows)
/// * `ParseError::MissingColumn` - no algorithm column
/// * `ParseError::InvalidValue` - non-numeric value in a numeric column
pub fn read_benchmarks(path: impl AsRef<Path>) -> Result<BenchmarkTable, ParseError> {
    let path = path.as_ref();
    debug!("Reading benchmarks from: {}", path.display());

    let file = File::open(path)?;
    let table = parse_benchmarks(file)?;

    info!(
        "Read {} benchmark rows ({} columns) from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Parse benchmark TSV content from any reader
pub fn parse_benchmarks<R: Read>(reader: R) -> Result<BenchmarkTable, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut layout: Vec<(usize, Column)> = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        match Column::from_header(header) {
            Some(column) if layout.iter().any(|(_, c)| *c == column) => {
                warn!("Duplicate header '{}' for column {}, ignoring", header, column);
            }
            Some(column) => layout.push((index, column)),
            None => debug!("Ignoring unknown column '{}'", header),
        }
    }

    if !layout.iter().any(|(_, c)| *c == Column::Algorithm) {
        return Err(ParseError::MissingColumn(Column::Algorithm.name().to_string()));
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let mut record = BenchmarkRecord::default();
        for (index, column) in &layout {
            let cell = row.get(*index).unwrap_or("");
            fill_cell(&mut record, *column, cell, line)?;
        }
        records.push(record);
    }

    Ok(BenchmarkTable::new(records, layout.into_iter().map(|(_, c)| c)))
}

/// Store one cell into the record
///
/// **Private** - internal helper for parse_benchmarks
fn fill_cell(
    record: &mut BenchmarkRecord,
    column: Column,
    cell: &str,
    line: u64,
) -> Result<(), ParseError> {
    let cell = cell.trim();
    match column {
        Column::Algorithm => record.algorithm = cell.to_string(),
        Column::ExitStatus => record.exit_status = ExitStatus::from_cell(cell),
        Column::VariantRank => record.variant_rank = parse_integer(column, cell, line)?,
        Column::MaxMatchCost => record.max_match_cost = parse_integer(column, cell, line)?,
        Column::K => record.k = parse_integer(column, cell, line)?,
        Column::SequenceLength => record.sequence_length = parse_count(column, cell, line)?,
        Column::PairCount => record.pair_count = parse_count(column, cell, line)?,
        Column::TrialCount => record.trial_count = parse_count(column, cell, line)?,
        Column::ErrorRate => record.error_rate = parse_float(column, cell, line)?,
        Column::ElapsedSeconds => record.elapsed_seconds = parse_float(column, cell, line)?,
        Column::PeakMemoryKb => record.peak_memory_kb = parse_float(column, cell, line)?,
        Column::StatesExpanded => {
            record.counters.states_expanded = parse_float(column, cell, line)?
        }
        Column::StatesExplored => {
            record.counters.states_explored = parse_float(column, cell, line)?
        }
        Column::PrecomputeTime => {
            record.counters.precompute_time = parse_float(column, cell, line)?
        }
        Column::AlignTime => record.counters.align_time = parse_float(column, cell, line)?,
        Column::PruneTime => record.counters.prune_time = parse_float(column, cell, line)?,
        Column::HeuristicValue => {
            record.counters.heuristic_value = parse_float(column, cell, line)?
        }
        Column::EditDistance => record.counters.edit_distance = parse_float(column, cell, line)?,
    }
    Ok(())
}

fn invalid(column: Column, cell: &str, line: u64) -> ParseError {
    ParseError::InvalidValue {
        column: column.name().to_string(),
        line,
        value: cell.to_string(),
    }
}

fn parse_float(column: Column, cell: &str, line: u64) -> Result<Option<f64>, ParseError> {
    if MISSING_CELL_VALUES.contains(&cell) {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|_| invalid(column, cell, line))
}

/// Integers may be written in float notation ("3.0", "1e6") by the harness
fn parse_integer(column: Column, cell: &str, line: u64) -> Result<Option<i64>, ParseError> {
    match parse_float(column, cell, line)? {
        None => Ok(None),
        Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(Some(v as i64)),
        Some(_) => Err(invalid(column, cell, line)),
    }
}

fn parse_count(column: Column, cell: &str, line: u64) -> Result<Option<u64>, ParseError> {
    match parse_integer(column, cell, line)? {
        None => Ok(None),
        Some(v) if v >= 0 => Ok(Some(v as u64)),
        Some(_) => Err(invalid(column, cell, line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "alg\tr\tn\te\ts\tnr\texit_status\tunused\n\
                       sh\t1\t1000\t0.05\t2.0\t10\tok\tx\n\
                       csh\t\t1e4\t0.05\t4.0\t10\ttimeout\tx\n";

    #[test]
    fn test_parse_benchmarks() {
        let table = parse_benchmarks(TSV.as_bytes()).unwrap();

        assert_eq!(table.len(), 2);
        assert!(table.has_column(Column::SequenceLength));
        assert!(!table.has_column(Column::TrialCount));

        let sh = &table.records()[0];
        assert_eq!(sh.algorithm, "sh");
        assert_eq!(sh.variant_rank, Some(1));
        assert_eq!(sh.sequence_length, Some(1000));
        assert_eq!(sh.pair_count, Some(10));

        let csh = &table.records()[1];
        assert_eq!(csh.variant_rank, None);
        assert_eq!(csh.sequence_length, Some(10_000));
        assert!(!csh.exit_status.is_success());
    }

    #[test]
    fn test_successful_filter() {
        let table = parse_benchmarks(TSV.as_bytes()).unwrap();
        let ok = table.successful();
        assert_eq!(ok.len(), 1);
        assert_eq!(ok.records()[0].algorithm, "sh");
    }

    #[test]
    fn test_invalid_numeric_cell() {
        let tsv = "alg\tn\nsh\tabc\n";
        let err = parse_benchmarks(tsv.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref column, .. } if column == "sequence_length"));
    }

    #[test]
    fn test_missing_algorithm_column() {
        let tsv = "n\ts\n1000\t1.0\n";
        assert!(matches!(
            parse_benchmarks(tsv.as_bytes()),
            Err(ParseError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_negative_length_rejected() {
        let tsv = "alg\tn\nsh\t-5\n";
        assert!(parse_benchmarks(tsv.as_bytes()).is_err());
    }
}
