//! Grouping of benchmark rows into plotted series.
//!
//! A `Grouping` says which attributes identify a series (algorithm alone,
//! algorithm + variant rank, or algorithm + variant rank + k). Grouping a
//! table yields one `Series` per `GroupKey`, each sorted by x, in the
//! canonical display order.

use crate::parser::schema::{BenchmarkRecord, Column, Field};
use crate::parser::table::BenchmarkTable;
use crate::utils::error::ConfigurationError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Attributes that identify one series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub enum Grouping {
    #[default]
    Algorithm,
    AlgorithmRank,
    AlgorithmRankK,
}

impl Grouping {
    /// Resolve a list of attribute names (harness aliases accepted)
    ///
    /// # Errors
    /// * `ConfigurationError::UnsupportedGrouping` - any other shape
    pub fn from_attributes<S: AsRef<str>>(attributes: &[S]) -> Result<Self, ConfigurationError> {
        let columns: Vec<Option<Column>> = attributes
            .iter()
            .map(|a| Column::from_header(a.as_ref()))
            .collect();

        match columns.as_slice() {
            [Some(Column::Algorithm)] => Ok(Grouping::Algorithm),
            [Some(Column::Algorithm), Some(Column::VariantRank)] => Ok(Grouping::AlgorithmRank),
            [Some(Column::Algorithm), Some(Column::VariantRank), Some(Column::K)] => {
                Ok(Grouping::AlgorithmRankK)
            }
            _ => Err(ConfigurationError::UnsupportedGrouping(
                attributes
                    .iter()
                    .map(|a| a.as_ref())
                    .collect::<Vec<_>>()
                    .join(","),
            )),
        }
    }

    pub fn attributes(self) -> &'static [Column] {
        match self {
            Grouping::Algorithm => &[Column::Algorithm],
            Grouping::AlgorithmRank => &[Column::Algorithm, Column::VariantRank],
            Grouping::AlgorithmRankK => &[Column::Algorithm, Column::VariantRank, Column::K],
        }
    }
}

impl FromStr for Grouping {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        Grouping::from_attributes(&parts)
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names: Vec<&str> = self.attributes().iter().map(|c| c.name()).collect();
        write!(f, "{}", names.join(","))
    }
}

impl TryFrom<Vec<String>> for Grouping {
    type Error = ConfigurationError;

    fn try_from(attributes: Vec<String>) -> Result<Self, Self::Error> {
        Grouping::from_attributes(&attributes)
    }
}

impl From<Grouping> for Vec<String> {
    fn from(grouping: Grouping) -> Self {
        grouping
            .attributes()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }
}

/// Identity of one plotted series.
///
/// Only the components selected by the grouping are set; two records share a
/// key iff all those components are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub algorithm: String,
    pub variant_rank: Option<i64>,
    pub k: Option<i64>,
}

impl GroupKey {
    pub fn new(algorithm: impl Into<String>) -> Self {
        Self {
            algorithm: algorithm.into(),
            variant_rank: None,
            k: None,
        }
    }

    pub fn with_rank(mut self, rank: i64) -> Self {
        self.variant_rank = Some(rank);
        self
    }

    pub fn with_k(mut self, k: i64) -> Self {
        self.k = Some(k);
        self
    }

    /// Key of `record` under `grouping`
    pub fn resolve(record: &BenchmarkRecord, grouping: Grouping) -> Self {
        let mut key = GroupKey::new(record.algorithm.clone());
        if grouping != Grouping::Algorithm {
            key.variant_rank = record.variant_rank;
        }
        if grouping == Grouping::AlgorithmRankK {
            key.k = record.k;
        }
        key
    }

    /// Rank 0 and missing both mean "not applicable"
    fn known_rank(&self) -> Option<i64> {
        self.variant_rank.filter(|r| *r != 0)
    }

    /// Label suffix describing the variant
    pub fn suffix(&self, grouping: Grouping) -> String {
        match (grouping, self.known_rank()) {
            (Grouping::Algorithm, _) | (_, None) => String::new(),
            (Grouping::AlgorithmRank, Some(1)) => " (exact)".to_string(),
            (Grouping::AlgorithmRank, Some(_)) => " (inexact)".to_string(),
            (Grouping::AlgorithmRankK, Some(rank)) => {
                let k = self.k.map_or_else(|| "-".to_string(), |k| k.to_string());
                format!(" ({}, {})", rank, k)
            }
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.algorithm)?;
        if let Some(rank) = self.variant_rank {
            write!(f, "/r{}", rank)?;
        }
        if let Some(k) = self.k {
            write!(f, "/k{}", k)?;
        }
        Ok(())
    }
}

/// One group's (x, y) points, sorted by x with unique x values
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub key: GroupKey,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(key: GroupKey, points: Vec<(f64, f64)>) -> Self {
        Self { key, points }
    }

    /// Rightmost point
    pub fn last(&self) -> Option<(f64, f64)> {
        self.points.last().copied()
    }

    pub fn max_x(&self) -> Option<f64> {
        self.last().map(|(x, _)| x)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Group a table into ordered series of (x, y) points
///
/// **Public** - main entry point for grouping
///
/// Rows with a missing x or y are skipped. Repeated x values within a group
/// are averaged. Series are ordered by `order` (see `sort_series`).
pub fn group_series(
    table: &BenchmarkTable,
    x: Field,
    y: Field,
    grouping: Grouping,
    order: &[String],
) -> Vec<Series> {
    let mut groups: BTreeMap<GroupKey, Vec<(f64, f64)>> = BTreeMap::new();
    let mut skipped = 0usize;

    for (row, record) in table.records().iter().enumerate() {
        match (table.value(row, x), table.value(row, y)) {
            (Some(xv), Some(yv)) => groups
                .entry(GroupKey::resolve(record, grouping))
                .or_default()
                .push((xv, yv)),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} rows with missing {} or {}", skipped, x, y);
    }

    let mut series: Vec<Series> = groups
        .into_iter()
        .map(|(key, points)| Series::new(key, merge_duplicate_x(points)))
        .collect();

    sort_series(&mut series, order);
    series
}

/// Sort points by x and average the y of repeated x values
fn merge_duplicate_x(mut points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f64, f64)> = Vec::with_capacity(points.len());
    let mut run: Vec<f64> = Vec::new();
    for (i, (x, y)) in points.iter().enumerate() {
        run.push(*y);
        let run_ends = points.get(i + 1).map_or(true, |(next, _)| next != x);
        if run_ends {
            merged.push((*x, run.iter().sum::<f64>() / run.len() as f64));
            run.clear();
        }
    }
    merged
}

/// Position of `algorithm` in the canonical order
pub fn canonical_position(algorithm: &str, order: &[String]) -> Option<usize> {
    order.iter().position(|a| a == algorithm)
}

/// Sort series by canonical algorithm order, then name, rank and k.
///
/// Algorithms missing from `order` are reported and placed last.
pub fn sort_series(series: &mut [Series], order: &[String]) {
    let unknown: BTreeSet<&str> = series
        .iter()
        .map(|s| s.key.algorithm.as_str())
        .filter(|a| canonical_position(a, order).is_none())
        .collect();
    for algorithm in &unknown {
        warn!(
            "Algorithm '{}' is not in the display order, placing it last",
            algorithm
        );
    }

    series.sort_by(|a, b| {
        let pa = canonical_position(&a.key.algorithm, order).unwrap_or(usize::MAX);
        let pb = canonical_position(&b.key.algorithm, order).unwrap_or(usize::MAX);
        pa.cmp(&pb).then_with(|| a.key.cmp(&b.key))
    });
}
