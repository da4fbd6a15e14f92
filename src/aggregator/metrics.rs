//! Derived metrics over benchmark tables.
//!
//! Every metric is a pure function of the raw columns of one row. A metric
//! whose denominator is zero or whose inputs are missing is `None`; it never
//! becomes an error or an infinity.

use crate::parser::schema::{BenchmarkRecord, Column, Metric};
use crate::parser::table::BenchmarkTable;
use crate::utils::error::SchemaError;
use log::debug;

/// Derive all computable metrics for a table
///
/// **Public** - main entry point for metric derivation
///
/// Metrics in `requested` must be computable, otherwise a `SchemaError`
/// names the first missing source column. Other metrics are added only when
/// all their source columns exist. The input table is not modified; deriving
/// twice gives the same result.
///
/// # Arguments
/// * `table` - Raw benchmark table (already filtered to successful runs)
/// * `requested` - Metrics the caller is going to read
pub fn derive_metrics(
    table: &BenchmarkTable,
    requested: &[Metric],
) -> Result<BenchmarkTable, SchemaError> {
    for metric in requested {
        check_sources(table, *metric)?;
    }

    let mut derived = table.clone();
    normalize_variant_rank(&mut derived);

    for metric in Metric::ALL {
        if check_sources(&derived, metric).is_err() {
            debug!("Skipping metric {}: source columns absent", metric);
            continue;
        }
        let values = derived
            .records()
            .iter()
            .map(|record| compute_metric(metric, record))
            .collect();
        derived.set_metric(metric, values);
    }

    debug!(
        "Derived metrics: {}",
        derived
            .metrics()
            .map(|m| m.name())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(derived)
}

/// Metrics that `derive_metrics` would add for this table
pub fn available_metrics(table: &BenchmarkTable) -> Vec<Metric> {
    Metric::ALL
        .into_iter()
        .filter(|m| check_sources(table, *m).is_ok())
        .collect()
}

/// Check that every source column of `metric` exists in the table
///
/// **Public** - also used to validate chart fields before plotting
pub fn check_sources(table: &BenchmarkTable, metric: Metric) -> Result<(), SchemaError> {
    if metric.needs_count()
        && !table.has_column(Column::PairCount)
        && !table.has_column(Column::TrialCount)
    {
        return Err(SchemaError {
            metric: metric.name().to_string(),
            column: format!("{} or {}", Column::PairCount, Column::TrialCount),
        });
    }

    match metric
        .required_columns()
        .iter()
        .find(|c| !table.has_column(**c))
    {
        Some(column) => Err(SchemaError {
            metric: metric.name().to_string(),
            column: column.name().to_string(),
        }),
        None => Ok(()),
    }
}

/// Fill missing variant ranks with 0.
///
/// Older tables carry the maximum match cost `m` instead of the rank; there
/// the rank is `m + 1`.
fn normalize_variant_rank(table: &mut BenchmarkTable) {
    let has_rank = table.has_column(Column::VariantRank);
    let has_match_cost = table.has_column(Column::MaxMatchCost);
    if !has_rank && !has_match_cost {
        return;
    }

    for record in table.records_mut() {
        if !has_rank {
            record.variant_rank = record.max_match_cost.map(|m| m + 1);
        }
        if record.variant_rank.is_none() {
            record.variant_rank = Some(0);
        }
    }
    table.insert_column(Column::VariantRank);
}

/// Compute one metric for one row
///
/// **Public** - exposed for tests and one-off computations
pub fn compute_metric(metric: Metric, record: &BenchmarkRecord) -> Option<f64> {
    let counters = &record.counters;
    let length = record.sequence_length.map(|n| n as f64);

    match metric {
        Metric::EffectiveCount => effective_count(record),
        Metric::TimePerUnit => ratio(record.elapsed_seconds, effective_count(record)),
        Metric::TimePerBase => ratio(
            record.elapsed_seconds,
            effective_count(record).zip(length).map(|(c, n)| c * n),
        ),
        Metric::ErrorRatePct => record.error_rate.map(|e| 100.0 * e),
        Metric::MemoryMb => record.peak_memory_kb.map(|kb| kb / 1000.0),
        Metric::AlignFraction => ratio(
            counters.align_time,
            counters
                .precompute_time
                .zip(counters.align_time)
                .map(|(p, a)| p + a),
        ),
        Metric::PruneFraction => ratio(counters.prune_time, counters.align_time),
        Metric::HeuristicAccuracy => ratio(counters.heuristic_value, counters.edit_distance),
        Metric::ExpansionEfficiency => ratio(counters.states_expanded, counters.states_explored),
        Metric::Band => ratio(counters.states_expanded, length).map(round2),
    }
}

/// Number of aligned pairs, falling back to the trial count
pub fn effective_count(record: &BenchmarkRecord) -> Option<f64> {
    record.pair_count.or(record.trial_count).map(|c| c as f64)
}

/// `num / den`, or `None` for missing inputs, zero denominators and
/// non-finite results
fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    let (num, den) = (num?, den?);
    if den == 0.0 {
        return None;
    }
    Some(num / den).filter(|v| v.is_finite())
}

/// Round to two decimals for display and tables
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
