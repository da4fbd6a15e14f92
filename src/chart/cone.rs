//! Growth cone: the region between linear and quadratic growth from an anchor.

use crate::aggregator::grouping::{GroupKey, Grouping};
use crate::parser::schema::Field;
use crate::parser::table::BenchmarkTable;
use crate::utils::config::{CONE_SAMPLES, CONE_X_MAX_FACTOR};
use crate::utils::error::LookupError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Where to anchor the cone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConeSpec {
    /// Algorithm of the reference group
    pub reference: String,

    /// Variant rank of the reference group; exact (1) is preferred when unset
    #[serde(default)]
    pub rank: Option<i64>,

    /// Anchor x
    pub x: f64,

    /// Right end of the cone; defaults to 3x the largest x of the data
    #[serde(default)]
    pub x_max: Option<f64>,
}

/// Linear and quadratic curves sharing the anchor point
#[derive(Debug, Clone, PartialEq)]
pub struct ConeRegion {
    pub x0: f64,
    pub y0: f64,
    pub x_max: f64,
    pub linear: Vec<(f64, f64)>,
    pub quadratic: Vec<(f64, f64)>,
}

impl ConeRegion {
    /// Build the cone between `x0` and `x_max`, sampled geometrically
    pub fn new(x0: f64, y0: f64, x_max: f64) -> Self {
        let mut cone = Self {
            x0,
            y0,
            x_max,
            linear: Vec::new(),
            quadratic: Vec::new(),
        };

        let xs = geometric_samples(x0, x_max, CONE_SAMPLES);
        cone.linear = xs.iter().map(|x| (*x, cone.linear_at(*x))).collect();
        cone.quadratic = xs.iter().map(|x| (*x, cone.quadratic_at(*x))).collect();
        cone
    }

    pub fn linear_at(&self, x: f64) -> f64 {
        self.y0 * (x / self.x0)
    }

    pub fn quadratic_at(&self, x: f64) -> f64 {
        self.y0 * (x / self.x0).powi(2)
    }

    /// Closed outline of the shaded region
    pub fn polygon(&self) -> Vec<(f64, f64)> {
        self.linear
            .iter()
            .chain(self.quadratic.iter().rev())
            .copied()
            .collect()
    }

    /// Highest y reached by the cone
    pub fn y_max(&self) -> f64 {
        self.quadratic_at(self.x_max).max(self.linear_at(self.x_max))
    }
}

/// `count` points from `start` to `end`, evenly spaced in log space
fn geometric_samples(start: f64, end: f64, count: usize) -> Vec<f64> {
    if count < 2 || start <= 0.0 || end <= start {
        return vec![start, end];
    }
    let ratio = (end / start).ln() / (count - 1) as f64;
    (0..count)
        .map(|i| match i {
            0 => start,
            i if i == count - 1 => end,
            i => start * (ratio * i as f64).exp(),
        })
        .collect()
}

/// Key of the reference group under `grouping`
///
/// **Public** - also used by the renderer to mark the reference series
///
/// # Errors
/// * `LookupError::UnknownGroup` - no row of that algorithm (and rank)
pub fn reference_key(
    table: &BenchmarkTable,
    grouping: Grouping,
    spec: &ConeSpec,
) -> Result<GroupKey, LookupError> {
    let candidates: Vec<GroupKey> = table
        .records()
        .iter()
        .filter(|r| r.algorithm == spec.reference)
        .map(|r| GroupKey::resolve(r, grouping))
        .filter(|k| spec.rank.map_or(true, |rank| k.variant_rank == Some(rank)))
        .collect();

    candidates
        .iter()
        .find(|k| k.variant_rank == Some(1))
        .or_else(|| candidates.iter().min())
        .cloned()
        .ok_or_else(|| LookupError::UnknownGroup(describe(spec)))
}

fn describe(spec: &ConeSpec) -> String {
    match spec.rank {
        Some(rank) => format!("{}/r{}", spec.reference, rank),
        None => spec.reference.clone(),
    }
}

/// Same x up to floating point noise from the TSV
fn same_x(a: f64, b: f64) -> bool {
    (a * 1e6).round() == (b * 1e6).round()
}

/// Build the cone anchored at the reference group's point at `spec.x`
///
/// **Public** - main entry point for cone construction
///
/// When several rows of the reference group share the anchor x, the largest
/// y is used.
///
/// # Errors
/// * `LookupError::UnknownGroup` - reference group absent
/// * `LookupError::NoAnchorPoint` - reference group has no point at `spec.x`
pub fn build_cone(
    table: &BenchmarkTable,
    x: Field,
    y: Field,
    grouping: Grouping,
    spec: &ConeSpec,
) -> Result<ConeRegion, LookupError> {
    let key = reference_key(table, grouping, spec)?;

    let y0 = table
        .records()
        .iter()
        .enumerate()
        .filter(|(_, r)| GroupKey::resolve(r, grouping) == key)
        .filter_map(|(row, _)| Some((table.value(row, x)?, table.value(row, y)?)))
        .filter(|(xv, _)| same_x(*xv, spec.x))
        .map(|(_, yv)| yv)
        .reduce(f64::max)
        .ok_or_else(|| LookupError::NoAnchorPoint {
            group: key.to_string(),
            x: spec.x,
        })?;

    let x_max = match spec.x_max {
        Some(x_max) => x_max,
        None => CONE_X_MAX_FACTOR * table.max(x).unwrap_or(spec.x),
    };

    debug!(
        "Cone anchored at ({}, {}) on {}, up to x = {}",
        spec.x, y0, key, x_max
    );
    Ok(ConeRegion::new(spec.x, y0, x_max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cone_endpoints() {
        let cone = ConeRegion::new(100.0, 5.0, 300.0);
        assert!((cone.quadratic_at(300.0) - 45.0).abs() < 1e-9);
        assert!((cone.linear_at(300.0) - 15.0).abs() < 1e-9);

        let (last_x, last_y) = *cone.quadratic.last().unwrap();
        assert_eq!(last_x, 300.0);
        assert!((last_y - 45.0).abs() < 1e-9);
        assert_eq!(cone.linear.first(), Some(&(100.0, 5.0)));
    }

    #[test]
    fn test_polygon_is_closed_outline() {
        let cone = ConeRegion::new(10.0, 1.0, 1000.0);
        let polygon = cone.polygon();
        assert_eq!(polygon.len(), 2 * CONE_SAMPLES);
        assert_eq!(polygon.first(), Some(&(10.0, 1.0)));
        assert_eq!(polygon.last(), Some(&(10.0, 1.0)));
    }

    #[test]
    fn test_geometric_samples() {
        let xs = geometric_samples(1.0, 1000.0, 4);
        assert_eq!(xs.len(), 4);
        assert!((xs[1] - 10.0).abs() < 1e-9);
        assert!((xs[2] - 100.0).abs() < 1e-9);
        assert_eq!(xs[3], 1000.0);
    }
}
