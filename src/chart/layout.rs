//! Scaling chart composition.
//!
//! Turns a benchmark table and a `ChartSpec` into a `Scene` (everything to be
//! drawn, in data coordinates) and hands it to the SVG generator.

use super::axis::{build_axis, Axis, AxisOptions, Scale, Tick};
use super::cone::{build_cone, ConeSpec};
use super::generator::render_svg;
use super::style::{Marker, StyleTable};
use super::trend::{fit_series, FitThresholds};
use crate::aggregator::grouping::{group_series, Grouping, Series};
use crate::aggregator::metrics::derive_metrics;
use crate::parser::schema::{Column, Field, Metric};
use crate::parser::table::BenchmarkTable;
use crate::utils::config::{
    DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_X_LOG_MARGIN, DEFAULT_Y_LOG_MARGIN,
};
use crate::utils::error::{ChartError, SchemaError};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Horizontal reference line, shown as an extra y tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: f64,

    #[serde(default = "default_threshold_label")]
    pub label: String,
}

fn default_threshold_label() -> String {
    "limit".to_string()
}

/// Everything that configures one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSpec {
    pub x: Field,
    pub y: Field,
    pub xlog: bool,
    pub ylog: bool,
    pub group_by: Grouping,

    /// Fit and draw `y ~ x^a` per group
    pub trend_line: bool,
    pub fit_min: FitThresholds,

    pub cone: Option<ConeSpec>,

    pub x_margin: Option<f64>,
    pub y_margin: Option<f64>,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub x_ticks: Option<Vec<f64>>,
    pub y_ticks: Option<Vec<f64>>,

    /// Legend box instead of labels next to the series
    pub legend: bool,
    pub title: Option<String>,
    pub threshold: Option<Threshold>,

    /// Join consecutive points of a series
    pub connect: bool,

    /// Output name, without extension
    pub filename: String,
    pub width: usize,
    pub height: usize,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            x: Field::Raw(Column::SequenceLength),
            y: Field::Derived(Metric::TimePerUnit),
            xlog: false,
            ylog: false,
            group_by: Grouping::Algorithm,
            trend_line: false,
            fit_min: FitThresholds::default(),
            cone: None,
            x_margin: None,
            y_margin: None,
            x_min: None,
            x_max: None,
            y_min: None,
            y_max: None,
            x_ticks: None,
            y_ticks: None,
            legend: false,
            title: None,
            threshold: None,
            connect: false,
            filename: "scaling".to_string(),
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
        }
    }
}

impl ChartSpec {
    /// Keys accepted when a chart is read from TOML
    pub const KEYS: &'static [&'static str] = &[
        "x",
        "y",
        "xlog",
        "ylog",
        "group_by",
        "trend_line",
        "fit_min",
        "cone",
        "x_margin",
        "y_margin",
        "x_min",
        "x_max",
        "y_min",
        "y_max",
        "x_ticks",
        "y_ticks",
        "legend",
        "title",
        "threshold",
        "connect",
        "filename",
        "width",
        "height",
    ];

    pub fn new(x: Field, y: Field) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Derived metrics this chart reads
    pub fn requested_metrics(&self) -> Vec<Metric> {
        [self.x.metric(), self.y.metric()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn x_options(&self) -> AxisOptions {
        AxisOptions {
            scale: if self.xlog { Scale::Log } else { Scale::Linear },
            margin: self.x_margin,
            min: self.x_min,
            max: self.x_max,
            ticks: self.x_ticks.clone(),
        }
    }

    fn y_options(&self) -> AxisOptions {
        AxisOptions {
            scale: if self.ylog { Scale::Log } else { Scale::Linear },
            margin: self.y_margin,
            min: self.y_min,
            max: self.y_max,
            ticks: self.y_ticks.clone(),
        }
    }
}

/// One group as drawn
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub label: String,
    pub color: String,
    pub marker: Marker,
    pub points: Vec<(f64, f64)>,
    pub connect: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendOverlay {
    pub color: String,
    pub points: Vec<(f64, f64)>,
}

/// Text placed next to a series, right-aligned above its anchor
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,

    /// Fitted exponent, drawn as `~n^a`
    pub exponent: Option<String>,
    pub color: String,
}

/// Everything to draw, in data coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub title: Option<String>,
    pub width: usize,
    pub height: usize,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<PlotSeries>,
    pub trends: Vec<TrendOverlay>,
    pub cone: Option<Vec<(f64, f64)>>,
    pub labels: Vec<SeriesLabel>,
    pub threshold: Option<Threshold>,
    pub legend: bool,
}

/// Result of rendering one chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartReport {
    pub filename: String,

    #[serde(skip)]
    pub svg: String,

    /// Series labels in drawing order
    pub series: Vec<String>,

    /// Series label -> exponent printed on the chart
    pub exponents: BTreeMap<String, String>,

    /// Series whose trend could not be fitted
    pub skipped: Vec<String>,
}

/// Ensure `field` can be read from `table`
fn require_field(table: &BenchmarkTable, field: Field) -> Result<(), SchemaError> {
    match field {
        Field::Raw(column) if !table.has_column(column) => Err(SchemaError {
            metric: field.name().to_string(),
            column: column.name().to_string(),
        }),
        _ => Ok(()),
    }
}

/// Drop points a log axis cannot show
fn plottable(series: &Series, xlog: bool, ylog: bool) -> Vec<(f64, f64)> {
    let points: Vec<(f64, f64)> = series
        .points
        .iter()
        .copied()
        .filter(|(x, y)| (!xlog || *x > 0.0) && (!ylog || *y > 0.0))
        .collect();
    if points.len() < series.points.len() {
        debug!(
            "Dropped {} non-positive points of {} on a log axis",
            series.points.len() - points.len(),
            series.key
        );
    }
    points
}

/// Render one scaling chart
///
/// **Public** - main entry point for chart rendering
///
/// # Arguments
/// * `table` - Benchmark rows (successful runs); derived metrics are added as needed
/// * `spec` - Chart configuration
/// * `styles` - Colour, marker and name lookup
///
/// # Returns
/// SVG text plus the labels, exponents and skipped groups of the chart
///
/// # Errors
/// * `ChartError::Schema` - x or y cannot be read from the table
/// * `ChartError::Lookup` - cone reference group or anchor point missing
/// * `ChartError::EmptyData` - no row has both x and y
pub fn render_chart(
    table: &BenchmarkTable,
    spec: &ChartSpec,
    styles: &StyleTable,
) -> Result<ChartReport, ChartError> {
    require_field(table, spec.x)?;
    require_field(table, spec.y)?;
    let table = derive_metrics(table, &spec.requested_metrics())?;

    let grouped = group_series(&table, spec.x, spec.y, spec.group_by, styles.order());
    let grouped: Vec<Series> = grouped
        .into_iter()
        .map(|s| {
            let points = plottable(&s, spec.xlog, spec.ylog);
            Series::new(s.key, points)
        })
        .filter(|s| !s.is_empty())
        .collect();

    if grouped.is_empty() {
        return Err(ChartError::EmptyData {
            x: spec.x.to_string(),
            y: spec.y.to_string(),
        });
    }
    info!(
        "Chart '{}': {} series of {} vs {}",
        spec.filename,
        grouped.len(),
        spec.y,
        spec.x
    );

    let cone = match &spec.cone {
        Some(cone_spec) => Some(build_cone(&table, spec.x, spec.y, spec.group_by, cone_spec)?),
        None => None,
    };

    let mut report = ChartReport {
        filename: spec.filename.clone(),
        svg: String::new(),
        series: Vec::new(),
        exponents: BTreeMap::new(),
        skipped: Vec::new(),
    };

    let mut series = Vec::with_capacity(grouped.len());
    let mut trends = Vec::new();
    let mut labels = Vec::new();

    for group in &grouped {
        let label = styles.label(&group.key, spec.group_by);
        if styles.color_for(&group.key.algorithm).is_none() {
            warn!(
                "No colour for algorithm '{}', using {}",
                group.key.algorithm, styles.fallback_color
            );
        }
        let color = styles.color(&group.key.algorithm).to_string();

        let fitted = if spec.trend_line {
            let trend = fit_series(group, &spec.fit_min);
            if trend.is_none() {
                report.skipped.push(label.clone());
            }
            trend
        } else {
            None
        };

        // With trend lines on, only fitted groups are labelled
        let (anchor, exponent) = match &fitted {
            Some(trend) => {
                report
                    .exponents
                    .insert(label.clone(), trend.exponent_label());
                trends.push(TrendOverlay {
                    color: color.clone(),
                    points: trend.curve.clone(),
                });
                (trend.end(), Some(trend.exponent_label()))
            }
            None if spec.trend_line => (None, None),
            None => (group.last(), None),
        };

        if let (Some((x, y)), false) = (anchor, spec.legend) {
            labels.push(SeriesLabel {
                x,
                y,
                text: label.clone(),
                exponent,
                color: color.clone(),
            });
        }

        series.push(PlotSeries {
            label: label.clone(),
            color,
            marker: styles.marker(&group.key),
            points: group.points.clone(),
            connect: spec.connect,
        });
        report.series.push(label);
    }

    if !report.exponents.is_empty() {
        info!("Exponents: {:?}", report.exponents);
    }

    let xs: Vec<f64> = grouped
        .iter()
        .flat_map(|s| s.points.iter().map(|(x, _)| *x))
        .collect();
    let ys: Vec<f64> = grouped
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, y)| *y))
        .collect();
    let y_extra: Vec<f64> = spec.threshold.iter().map(|t| t.value).collect();

    let x_axis = build_axis(spec.x, &xs, &[], &spec.x_options(), DEFAULT_X_LOG_MARGIN);
    let mut y_axis = build_axis(spec.y, &ys, &y_extra, &spec.y_options(), DEFAULT_Y_LOG_MARGIN);
    if let Some(threshold) = &spec.threshold {
        y_axis.add_tick(Tick::plain(threshold.value, threshold.label.clone()));
    }

    let scene = Scene {
        title: spec.title.clone(),
        width: spec.width,
        height: spec.height,
        x_axis,
        y_axis,
        series,
        trends,
        cone: cone.map(|c| c.polygon()),
        labels,
        threshold: spec.threshold.clone(),
        legend: spec.legend,
    };

    report.svg = render_svg(&scene);
    Ok(report)
}
