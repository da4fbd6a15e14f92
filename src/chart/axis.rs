//! Axis limits and ticks.
//!
//! Log axes are padded by a multiplicative margin on both sides. Linear axes
//! start at a fixed lower bound (0 unless overridden) and get a little
//! headroom above the data.

use crate::parser::schema::Field;
use crate::utils::config::LINEAR_AXIS_HEADROOM;
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

/// How tick values are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFormat {
    Plain,
    Percent,
}

/// One labelled tick
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub value: f64,

    /// Text of the label; for powers of ten this is the base "10"
    pub label: String,

    /// Superscript drawn after `label`
    pub exponent: Option<i32>,
}

impl Tick {
    pub fn plain(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            exponent: None,
        }
    }

    fn power_of_ten(exponent: i32) -> Self {
        Self {
            value: 10f64.powi(exponent),
            label: "10".to_string(),
            exponent: Some(exponent),
        }
    }

    /// Label as plain text, e.g. "10^3"
    pub fn text(&self) -> String {
        match self.exponent {
            Some(e) => format!("{}^{}", self.label, e),
            None => self.label.clone(),
        }
    }
}

/// Per-axis overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisOptions {
    pub scale: Scale,

    /// Log axes: multiplicative padding. Linear axes: fraction of the range
    /// added above the data.
    pub margin: Option<f64>,

    pub min: Option<f64>,
    pub max: Option<f64>,

    /// Explicit ticks replace the automatic ones
    pub ticks: Option<Vec<f64>>,
}

/// A fully resolved axis
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub scale: Scale,
    pub min: f64,
    pub max: f64,
    pub ticks: Vec<Tick>,
    pub label: String,
}

impl Axis {
    /// Position of `value` along the axis, 0 at `min` and 1 at `max`.
    /// Non-positive values have no position on a log axis.
    pub fn fraction(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match self.scale {
            Scale::Linear => Some((value - self.min) / (self.max - self.min)),
            Scale::Log if value > 0.0 => {
                Some((value.ln() - self.min.ln()) / (self.max.ln() - self.min.ln()))
            }
            Scale::Log => None,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn is_log(&self) -> bool {
        self.scale == Scale::Log
    }

    /// Insert an extra labelled tick, replacing any tick at the same value
    pub fn add_tick(&mut self, tick: Tick) {
        self.ticks.retain(|t| t.value != tick.value);
        self.ticks.push(tick);
        self.ticks.sort_by(|a, b| a.value.total_cmp(&b.value));
    }
}

/// Compute limits and ticks for one axis
///
/// **Public** - used by the chart layout for both axes
///
/// # Arguments
/// * `field` - Quantity on the axis; picks the label and tick format
/// * `data` - Observed values (sequence-length ticks stay inside their range)
/// * `extra` - Values that must be inside the limits but are not data
/// * `options` - Scale and overrides
/// * `log_margin` - Margin used when `options.margin` is unset on a log axis
pub fn build_axis(
    field: Field,
    data: &[f64],
    extra: &[f64],
    options: &AxisOptions,
    log_margin: f64,
) -> Axis {
    let usable = |v: &&f64| v.is_finite() && (options.scale == Scale::Linear || **v > 0.0);
    let observed: Vec<f64> = data.iter().filter(usable).copied().collect();
    let all: Vec<f64> = data.iter().chain(extra).filter(usable).copied().collect();

    let format = if field.is_error_rate_pct() {
        TickFormat::Percent
    } else {
        TickFormat::Plain
    };

    let (min, max) = limits(&all, options, format, log_margin);

    let ticks = match &options.ticks {
        Some(explicit) => explicit
            .iter()
            .filter(|v| **v >= min && **v <= max)
            .map(|v| format_tick(*v, options.scale, format, None))
            .collect(),
        None if field.is_sequence_length() => {
            match range(&observed) {
                Some((lo, hi)) => powers_of_ten(lo, hi),
                None => powers_of_ten(min, max),
            }
        }
        None => auto_ticks(min, max, options.scale, format),
    };

    Axis {
        scale: options.scale,
        min,
        max,
        ticks,
        label: field.display_name().to_string(),
    }
}

fn range(values: &[f64]) -> Option<(f64, f64)> {
    let lo = values.iter().copied().reduce(f64::min)?;
    let hi = values.iter().copied().reduce(f64::max)?;
    Some((lo, hi))
}

/// **Private** - limits before overrides are applied last
fn limits(values: &[f64], options: &AxisOptions, format: TickFormat, log_margin: f64) -> (f64, f64) {
    let (lo, hi) = range(values).unwrap_or(match options.scale {
        Scale::Log => (1.0, 10.0),
        Scale::Linear => (0.0, 1.0),
    });

    let (mut min, mut max) = match options.scale {
        Scale::Log => {
            let margin = options.margin.unwrap_or(log_margin).max(1.0);
            (lo / margin, hi * margin)
        }
        Scale::Linear => {
            let min = options.min.unwrap_or_else(|| lo.min(0.0));
            let headroom = match format {
                TickFormat::Percent => options.margin.unwrap_or(0.0),
                TickFormat::Plain => options.margin.unwrap_or(LINEAR_AXIS_HEADROOM),
            };
            (min, hi + headroom * (hi - min))
        }
    };

    if let Some(v) = options.min {
        if options.scale == Scale::Log && v <= 0.0 {
            warn!("Ignoring lower limit {} on a log axis", v);
        } else {
            min = v;
        }
    }
    if let Some(v) = options.max {
        if options.scale == Scale::Log && v <= 0.0 {
            warn!("Ignoring upper limit {} on a log axis", v);
        } else {
            max = v;
        }
    }

    if max <= min {
        match options.scale {
            Scale::Log if min > 0.0 => {
                min /= 10.0;
                max = min * 100.0;
            }
            Scale::Log => {
                min = 1.0;
                max = 10.0;
            }
            Scale::Linear => max = min + 1.0,
        }
    }
    (min, max)
}

/// Powers of ten between `lo` and `hi` inclusive
fn powers_of_ten(lo: f64, hi: f64) -> Vec<Tick> {
    if lo <= 0.0 || hi < lo {
        return Vec::new();
    }
    // Round to absorb float noise in log10 of exact powers
    let first = (lo.log10() - 1e-9).ceil() as i32;
    let last = (hi.log10() + 1e-9).floor() as i32;
    (first..=last).map(Tick::power_of_ten).collect()
}

fn auto_ticks(min: f64, max: f64, scale: Scale, format: TickFormat) -> Vec<Tick> {
    if scale == Scale::Log {
        let ticks = powers_of_ten(min, max);
        if !ticks.is_empty() {
            return ticks;
        }
    }

    let step = nice_step((max - min) / 5.0);
    let decimals = (-step.log10().floor()).max(0.0) as usize;
    let first = (min / step - 1e-9).ceil() as i64;
    let last = (max / step + 1e-9).floor() as i64;
    (first..=last)
        .map(|i| i as f64 * step)
        .filter(|v| scale == Scale::Linear || *v > 0.0)
        .map(|v| format_tick(v, scale, format, Some(decimals)))
        .collect()
}

/// Smallest 1, 2 or 5 times a power of ten that is at least `raw`
fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = [1.0, 2.0, 5.0]
        .into_iter()
        .find(|f| normalized <= *f)
        .unwrap_or(10.0);
    factor * magnitude
}

fn format_tick(value: f64, scale: Scale, format: TickFormat, decimals: Option<usize>) -> Tick {
    if scale == Scale::Log && value > 0.0 {
        let exponent = value.log10().round();
        if (10f64.powf(exponent) - value).abs() <= value * 1e-9 {
            return Tick::power_of_ten(exponent as i32);
        }
    }
    let label = match format {
        TickFormat::Percent => format!("{:.0}%", value),
        TickFormat::Plain => match decimals {
            Some(d) => format!("{:.*}", d, value),
            None => format_number(value),
        },
    };
    Tick::plain(value, label)
}

/// Short decimal form without trailing zeros
pub fn format_number(value: f64) -> String {
    let text = format!("{:.6}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        t => t.to_string(),
    }
}
