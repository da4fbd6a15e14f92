//! SVG generation for scaling charts.
//!
//! Writes the SVG by hand instead of going through a plotting crate:
//! - Mixed log/linear axes with custom tick labels (10^k, percentages)
//! - Grey cone shading clipped to the plot area
//! - Labels right-aligned at the end of each series

use super::axis::{Axis, Tick};
use super::layout::{PlotSeries, Scene, SeriesLabel};
use super::style::Marker;
use log::debug;
use std::fmt::Write;

const BACKGROUND: &str = "#F8F8F8";
const SPINE: &str = "#333333";
const CONE_FILL: &str = "grey";
const CONE_OPACITY: f64 = 0.15;
const MARKER_SIZE: f64 = 4.0;

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 45.0;
const MARGIN_BOTTOM: f64 = 50.0;

/// Pixel frame of the plot area
struct Frame<'a> {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x: &'a Axis,
    y: &'a Axis,
}

impl Frame<'_> {
    fn px(&self, x: f64) -> Option<f64> {
        self.x.fraction(x).map(|f| self.left + f * self.width)
    }

    fn py(&self, y: f64) -> Option<f64> {
        self.y.fraction(y).map(|f| self.top + (1.0 - f) * self.height)
    }

    fn point(&self, (x, y): (f64, f64)) -> Option<(f64, f64)> {
        Some((self.px(x)?, self.py(y)?))
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Render a scene to an SVG document
///
/// **Public** - called by `render_chart`
pub fn render_svg(scene: &Scene) -> String {
    let width = scene.width as f64;
    let height = scene.height as f64;
    let frame = Frame {
        left: MARGIN_LEFT,
        top: MARGIN_TOP,
        width: (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
        height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        x: &scene.x_axis,
        y: &scene.y_axis,
    };

    let mut svg = String::new();

    // Header
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        scene.width, scene.height, scene.width, scene.height
    );
    svg.push_str(
        r#"<style>text { font-family: sans-serif; } .tick { font-size: 12px; } .axis-label { font-size: 14px; } .series-label { font-size: 15px; }</style>"#,
    );
    let _ = write!(
        svg,
        r#"<defs><clipPath id="plot-area"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath></defs>"#,
        frame.left, frame.top, frame.width, frame.height
    );
    let _ = write!(
        svg,
        r#"<rect width="{}" height="{}" fill="white"/>"#,
        scene.width, scene.height
    );

    // Background and grid
    let _ = write!(
        svg,
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
        frame.left, frame.top, frame.width, frame.height, BACKGROUND
    );
    render_grid(&mut svg, &frame);

    // Data, clipped to the plot area
    svg.push_str(r#"<g clip-path="url(#plot-area)">"#);
    if let Some(cone) = &scene.cone {
        render_cone(&mut svg, &frame, cone);
    }
    if let Some(threshold) = &scene.threshold {
        if let Some(y) = frame.py(threshold.value) {
            let _ = write!(
                svg,
                r##"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="#888888" stroke-dasharray="4 3"/>"##,
                frame.left,
                y,
                frame.right(),
                y
            );
        }
    }
    for trend in &scene.trends {
        render_polyline(&mut svg, &frame, &trend.points, &trend.color, 0.9);
    }
    for series in &scene.series {
        render_series(&mut svg, &frame, series);
    }
    svg.push_str("</g>");

    // Axes
    render_spines(&mut svg, &frame);
    render_ticks(&mut svg, &frame);
    render_axis_labels(&mut svg, &frame, width);

    // Annotations
    for label in &scene.labels {
        render_label(&mut svg, &frame, label);
    }
    if scene.legend {
        render_legend(&mut svg, &frame, &scene.series);
    }
    if let Some(title) = &scene.title {
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="20" font-size="16" text-anchor="middle" font-weight="bold">{}</text>"#,
            width / 2.0,
            escape(title)
        );
    }

    svg.push_str("</svg>");
    debug!("Chart SVG generated ({} bytes)", svg.len());
    svg
}

/// White horizontal lines at the y ticks
fn render_grid(out: &mut String, frame: &Frame) {
    for tick in &frame.y.ticks {
        if let Some(y) = frame.py(tick.value) {
            let _ = write!(
                out,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="white" stroke-width="1"/>"#,
                frame.left,
                y,
                frame.right(),
                y
            );
        }
    }
}

fn render_cone(out: &mut String, frame: &Frame, polygon: &[(f64, f64)]) {
    let points = pixel_points(frame, polygon);
    if points.is_empty() {
        return;
    }
    let _ = write!(
        out,
        r#"<polygon points="{}" fill="{}" fill-opacity="{}" stroke="none"/>"#,
        points, CONE_FILL, CONE_OPACITY
    );
}

fn pixel_points(frame: &Frame, points: &[(f64, f64)]) -> String {
    points
        .iter()
        .filter_map(|p| frame.point(*p))
        .map(|(x, y)| format!("{:.2},{:.2}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_polyline(out: &mut String, frame: &Frame, points: &[(f64, f64)], color: &str, opacity: f64) {
    let points = pixel_points(frame, points);
    if points.is_empty() {
        return;
    }
    let _ = write!(
        out,
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="1.5" stroke-opacity="{}"/>"#,
        points, color, opacity
    );
}

fn render_series(out: &mut String, frame: &Frame, series: &PlotSeries) {
    let _ = write!(out, r#"<g class="series"><title>{}</title>"#, escape(&series.label));
    if series.connect {
        render_polyline(out, frame, &series.points, &series.color, 1.0);
    }
    for (x, y) in series.points.iter().filter_map(|p| frame.point(*p)) {
        render_marker(out, series.marker, x, y, &series.color);
    }
    out.push_str("</g>");
}

fn render_marker(out: &mut String, marker: Marker, x: f64, y: f64, color: &str) {
    let s = MARKER_SIZE;
    let _ = match marker {
        Marker::Circle => write!(
            out,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}"/>"#,
            x, y, s, color
        ),
        Marker::Square => write!(
            out,
            r#"<rect x="{:.2}" y="{:.2}" width="{}" height="{}" fill="{}"/>"#,
            x - s,
            y - s,
            2.0 * s,
            2.0 * s,
            color
        ),
        Marker::Triangle => write!(
            out,
            r#"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="{}"/>"#,
            x,
            y - s,
            x - s,
            y + s,
            x + s,
            y + s,
            color
        ),
    };
}

/// Bottom spine always; left spine only for linear x axes
fn render_spines(out: &mut String, frame: &Frame) {
    let _ = write!(
        out,
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
        frame.left,
        frame.bottom(),
        frame.right(),
        frame.bottom(),
        SPINE
    );
    if !frame.x.is_log() {
        let _ = write!(
            out,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
            frame.left,
            frame.top,
            frame.left,
            frame.bottom(),
            SPINE
        );
    }
}

fn render_ticks(out: &mut String, frame: &Frame) {
    for tick in &frame.x.ticks {
        if let Some(x) = frame.px(tick.value) {
            let _ = write!(
                out,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
                x,
                frame.bottom(),
                x,
                frame.bottom() + 4.0,
                SPINE
            );
            let _ = write!(
                out,
                r#"<text class="tick" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                x,
                frame.bottom() + 18.0,
                tick_text(tick)
            );
        }
    }
    for tick in &frame.y.ticks {
        if let Some(y) = frame.py(tick.value) {
            let _ = write!(
                out,
                r#"<text class="tick" x="{:.2}" y="{:.2}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
                frame.left - 6.0,
                y,
                tick_text(tick)
            );
        }
    }
}

fn tick_text(tick: &Tick) -> String {
    match tick.exponent {
        Some(e) => format!(
            r#"{}<tspan baseline-shift="super" font-size="9">{}</tspan>"#,
            escape(&tick.label),
            e
        ),
        None => escape(&tick.label),
    }
}

/// x label centred below the axis, y label horizontal above the plot
fn render_axis_labels(out: &mut String, frame: &Frame, width: f64) {
    let _ = write!(
        out,
        r#"<text class="axis-label" x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
        frame.left + frame.width / 2.0,
        frame.bottom() + 40.0,
        escape(&frame.x.label)
    );
    let _ = write!(
        out,
        r#"<text class="axis-label" x="{:.2}" y="{:.2}" text-anchor="start">{}</text>"#,
        (frame.left - 60.0).max(2.0).min(width),
        frame.top - 10.0,
        escape(&frame.y.label)
    );
}

fn render_label(out: &mut String, frame: &Frame, label: &SeriesLabel) {
    let Some((x, y)) = frame.point((label.x, label.y)) else {
        return;
    };
    let trend = match &label.exponent {
        Some(exponent) => format!(
            r#" ~n<tspan baseline-shift="super" font-size="10">{}</tspan>"#,
            escape(exponent)
        ),
        None => String::new(),
    };
    let _ = write!(
        out,
        r#"<text class="series-label" x="{:.2}" y="{:.2}" text-anchor="end" fill="{}">{}{}</text>"#,
        x,
        y - 4.0,
        label.color,
        escape(&label.text),
        trend
    );
}

fn render_legend(out: &mut String, frame: &Frame, series: &[PlotSeries]) {
    if series.is_empty() {
        return;
    }
    let row = 18.0;
    let longest = series.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);
    let box_width = 30.0 + 7.5 * longest as f64;
    let box_height = row * series.len() as f64 + 8.0;
    let (x0, y0) = (frame.left + 10.0, frame.top + 10.0);

    let _ = write!(
        out,
        r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="white" fill-opacity="0.8" stroke="#CCCCCC"/>"##,
        x0, y0, box_width, box_height
    );
    for (i, entry) in series.iter().enumerate() {
        let y = y0 + 4.0 + row * (i as f64 + 0.5);
        render_marker(out, entry.marker, x0 + 12.0, y, &entry.color);
        let _ = write!(
            out,
            r#"<text class="tick" x="{:.2}" y="{:.2}" dominant-baseline="middle">{}</text>"#,
            x0 + 24.0,
            y,
            escape(&entry.label)
        );
    }
}

/// Escape text content for XML
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::axis::Scale;
    use crate::chart::layout::Threshold;

    fn axis(scale: Scale, min: f64, max: f64) -> Axis {
        Axis {
            scale,
            min,
            max,
            ticks: vec![Tick::plain(1.0, "1")],
            label: "Runtime [s]".to_string(),
        }
    }

    fn scene(x_scale: Scale) -> Scene {
        Scene {
            title: Some("A & B".to_string()),
            width: 600,
            height: 400,
            x_axis: axis(x_scale, 1.0, 100.0),
            y_axis: axis(Scale::Linear, 0.0, 10.0),
            series: vec![PlotSeries {
                label: "CSH (exact)".to_string(),
                color: "#317D32".to_string(),
                marker: Marker::Triangle,
                points: vec![(10.0, 1.0), (100.0, 5.0)],
                connect: true,
            }],
            trends: Vec::new(),
            cone: None,
            labels: vec![SeriesLabel {
                x: 100.0,
                y: 5.0,
                text: "CSH (exact)".to_string(),
                exponent: Some("1.25".to_string()),
                color: "#317D32".to_string(),
            }],
            threshold: Some(Threshold {
                value: 8.0,
                label: "limit".to_string(),
            }),
            legend: false,
        }
    }

    #[test]
    fn test_svg_structure() {
        let svg = render_svg(&scene(Scale::Log));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(BACKGROUND));
        assert!(svg.contains("A &amp; B"));
        assert!(svg.contains(r#"baseline-shift="super" font-size="10">1.25"#));
        assert!(svg.contains("stroke-dasharray"));
        assert_eq!(svg.matches("<polyline").count(), 1);
    }

    #[test]
    fn test_left_spine_hidden_for_log_x() {
        let spines = |svg: &str| svg.matches(&format!(r#"stroke="{}"/>"#, SPINE)).count();
        let log = render_svg(&scene(Scale::Log));
        let linear = render_svg(&scene(Scale::Linear));
        assert_eq!(spines(&linear), spines(&log) + 1);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
    }
}
