//! Power-law trend fitting.
//!
//! Fits `ln y = a ln x + b` by ordinary least squares. The slope `a` is the
//! scaling exponent shown next to each series (`~n^a`).

use crate::aggregator::grouping::{GroupKey, Series};
use crate::aggregator::metrics::round2;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Best-fit line in log-log space
#[derive(Debug, Clone, PartialEq)]
pub struct FittedTrend {
    /// Exponent `a`
    pub slope: f64,

    /// Intercept `b` (natural log)
    pub intercept: f64,

    /// Smallest and largest x used in the fit
    pub x_range: (f64, f64),

    /// Fitted curve at the x values of the group
    pub curve: Vec<(f64, f64)>,
}

impl FittedTrend {
    /// y on the fitted curve
    pub fn evaluate(&self, x: f64) -> f64 {
        x.powf(self.slope) * self.intercept.exp()
    }

    /// Exponent rounded for display
    pub fn exponent(&self) -> f64 {
        round2(self.slope)
    }

    pub fn exponent_label(&self) -> String {
        format!("{:.2}", self.slope)
    }

    /// Rightmost point of the curve, where the label goes
    pub fn end(&self) -> Option<(f64, f64)> {
        self.curve.last().copied()
    }
}

/// Minimum x per algorithm for the fit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitThresholds {
    /// Applies to algorithms without their own entry
    pub default: Option<f64>,

    pub per_algorithm: BTreeMap<String, f64>,
}

impl FitThresholds {
    pub fn uniform(min_x: f64) -> Self {
        Self {
            default: Some(min_x),
            per_algorithm: BTreeMap::new(),
        }
    }

    pub fn for_key(&self, key: &GroupKey) -> Option<f64> {
        self.per_algorithm
            .get(&key.algorithm)
            .copied()
            .or(self.default)
    }
}

/// Fit a power law through `points`
///
/// **Public** - core fitting routine
///
/// Points with non-positive or non-finite coordinates, and points below
/// `min_x`, are dropped before the log transform. Returns `None` when fewer
/// than two points remain or all remaining x are equal.
pub fn fit_power_law(points: &[(f64, f64)], min_x: Option<f64>) -> Option<FittedTrend> {
    let kept: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite() && *x > 0.0 && *y > 0.0)
        .filter(|(x, _)| min_x.map_or(true, |m| *x >= m))
        .collect();

    if kept.len() < 2 {
        return None;
    }

    let logs: Vec<(f64, f64)> = kept.iter().map(|(x, y)| (x.ln(), y.ln())).collect();
    let n = logs.len() as f64;
    let mean_x = logs.iter().map(|(lx, _)| lx).sum::<f64>() / n;
    let mean_y = logs.iter().map(|(_, ly)| ly).sum::<f64>() / n;

    let sxx: f64 = logs.iter().map(|(lx, _)| (lx - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = logs
        .iter()
        .map(|(lx, ly)| (lx - mean_x) * (ly - mean_y))
        .sum();

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let min = kept.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let max = kept.iter().map(|(x, _)| *x).fold(f64::NEG_INFINITY, f64::max);

    let mut trend = FittedTrend {
        slope,
        intercept,
        x_range: (min, max),
        curve: Vec::new(),
    };
    trend.curve = kept.iter().map(|(x, _)| (*x, trend.evaluate(*x))).collect();
    Some(trend)
}

/// Fit the trend of one series, applying its threshold
///
/// Series that cannot be fitted are reported and yield `None`.
pub fn fit_series(series: &Series, thresholds: &FitThresholds) -> Option<FittedTrend> {
    let min_x = thresholds.for_key(&series.key);
    let trend = fit_power_law(&series.points, min_x);
    if trend.is_none() {
        info!(
            "Skipping trend line for {}: fewer than two usable points",
            series.key
        );
    }
    trend
}
