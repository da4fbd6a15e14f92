//! Summary tables at a single sequence length.
//!
//! Pivots runtime per pair and memory by algorithm x error rate, and computes
//! the speedup of our best algorithm over the best competitor per error rate.

use super::metrics::derive_metrics;
use crate::parser::schema::{Field, Metric};
use crate::parser::table::BenchmarkTable;
use crate::utils::error::SummaryError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which rows and algorithms go into the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    pub sequence_length: u64,

    /// Row order of the table; algorithms not listed are left out
    pub order: Vec<String>,

    /// Speedup is best time of `theirs` over best time of `ours`
    pub ours: Vec<String>,
    pub theirs: Vec<String>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        let names = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            sequence_length: 10_000_000,
            order: names(&["edlib", "biwfa", "sh", "csh"]),
            ours: names(&["sh", "csh"]),
            theirs: names(&["edlib", "biwfa"]),
        }
    }
}

/// One row of the pivot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub algorithm: String,

    /// Mean runtime per pair, one entry per error rate
    pub time_per_unit: Vec<Option<f64>>,

    /// Mean peak memory in MB, one entry per error rate
    pub memory_mb: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Speedup {
    pub error_rate: f64,
    pub ours: Option<f64>,
    pub theirs: Option<f64>,

    /// `theirs / ours`
    pub speedup: Option<f64>,
}

/// Pivot and speedups at one sequence length
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub sequence_length: u64,

    /// Column order, ascending
    pub error_rates: Vec<f64>,
    pub rows: Vec<SummaryRow>,
    pub speedups: Vec<Speedup>,
}

impl Summary {
    pub fn row(&self, algorithm: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.algorithm == algorithm)
    }

    /// Plain-text speedup report, one line per error rate
    pub fn speedup_text(&self) -> String {
        let mut text = format!("Speedup at n = {}:\n", format_length(self.sequence_length));
        for s in &self.speedups {
            let value = s
                .speedup
                .map_or_else(|| "n/a".to_string(), |v| format_significant(v, 4));
            text.push_str(&format!("Speedup at {:.2}: {}\n", s.error_rate, value));
        }
        text
    }
}

/// Build the summary for `config.sequence_length`
///
/// **Public** - main entry point for summary tables
///
/// Rows are averaged per (algorithm, error rate). Memory is left empty when
/// the table has no memory column.
///
/// # Errors
/// * `SummaryError::Schema` - runtime per pair cannot be derived
/// * `SummaryError::NoRows` - no row at the requested sequence length
pub fn build_summary(
    table: &BenchmarkTable,
    config: &SummaryConfig,
) -> Result<Summary, SummaryError> {
    let table = derive_metrics(table, &[Metric::TimePerUnit])?;
    let at_length = table.filter(|r| r.sequence_length == Some(config.sequence_length));
    if at_length.is_empty() {
        return Err(SummaryError::NoRows(config.sequence_length));
    }
    debug!(
        "{} rows at sequence length {}",
        at_length.len(),
        config.sequence_length
    );

    let mut error_rates = at_length.error_rates();
    error_rates.sort_by(f64::total_cmp);

    let time = pivot(&at_length, Field::Derived(Metric::TimePerUnit), &error_rates);
    let memory = pivot(&at_length, Field::Derived(Metric::MemoryMb), &error_rates);

    let rows: Vec<SummaryRow> = config
        .order
        .iter()
        .filter_map(|algorithm| {
            let time_per_unit = time.get(algorithm)?.clone();
            let memory_mb = memory
                .get(algorithm)
                .cloned()
                .unwrap_or_else(|| vec![None; error_rates.len()]);
            Some(SummaryRow {
                algorithm: algorithm.clone(),
                time_per_unit,
                memory_mb,
            })
        })
        .collect();

    let speedups = error_rates
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let best = |algorithms: &[String]| {
                algorithms
                    .iter()
                    .filter_map(|a| time.get(a).and_then(|values| values[i]))
                    .reduce(f64::min)
            };
            let ours = best(&config.ours);
            let theirs = best(&config.theirs);
            Speedup {
                error_rate: *e,
                ours,
                theirs,
                speedup: ours.zip(theirs).map(|(o, t)| t / o).filter(|v| v.is_finite()),
            }
        })
        .collect();

    info!(
        "Summary at n = {}: {} algorithms x {} error rates",
        config.sequence_length,
        rows.len(),
        error_rates.len()
    );

    Ok(Summary {
        sequence_length: config.sequence_length,
        error_rates,
        rows,
        speedups,
    })
}

/// Mean of `field` per algorithm and error rate
///
/// **Private** - internal helper for build_summary
fn pivot(
    table: &BenchmarkTable,
    field: Field,
    error_rates: &[f64],
) -> BTreeMap<String, Vec<Option<f64>>> {
    let mut sums: BTreeMap<String, Vec<(f64, usize)>> = BTreeMap::new();

    for (row, record) in table.records().iter().enumerate() {
        let (Some(value), Some(e)) = (table.value(row, field), record.error_rate) else {
            continue;
        };
        let Some(column) = error_rates.iter().position(|r| *r == e) else {
            continue;
        };
        let cells = sums
            .entry(record.algorithm.clone())
            .or_insert_with(|| vec![(0.0, 0); error_rates.len()]);
        cells[column].0 += value;
        cells[column].1 += 1;
    }

    sums.into_iter()
        .map(|(algorithm, cells)| {
            let means = cells
                .into_iter()
                .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
                .collect();
            (algorithm, means)
        })
        .collect()
}

/// "10^7" for powers of ten, the plain number otherwise
fn format_length(length: u64) -> String {
    let mut power = 0;
    let mut rest = length;
    while rest >= 10 && rest % 10 == 0 {
        rest /= 10;
        power += 1;
    }
    if rest == 1 && power > 0 {
        format!("10^{}", power)
    } else {
        length.to_string()
    }
}

/// Format with `digits` significant digits.
///
/// Fixed notation keeps at least one decimal; very large or small values
/// use scientific notation (`1.235e+04`).
pub fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{:.1}", value);
    }
    let digits = digits.max(1);

    // Exponent after rounding to the requested precision
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => (scientific.clone(), 0),
    };

    if exponent < -4 || exponent >= digits as i32 {
        let mantissa = trim_zeros(&mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let decimals = (digits as i32 - 1 - exponent).max(0) as usize;
    let fixed = trim_zeros(&format!("{:.*}", decimals, value));
    if fixed.contains('.') {
        fixed
    } else {
        format!("{}.0", fixed)
    }
}

fn trim_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}
