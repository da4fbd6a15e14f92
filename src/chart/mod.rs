//! Scaling chart rendering.
//!
//! This module handles:
//! - Power-law trend fitting per series
//! - Growth cone construction
//! - Axis limits, ticks and styling
//! - SVG output of the composed chart

pub mod axis;
pub mod cone;
pub mod generator;
pub mod layout;
pub mod style;
pub mod trend;

// Re-export main types
pub use axis::{Axis, AxisOptions, Scale, Tick};
pub use cone::{build_cone, ConeRegion, ConeSpec};
pub use generator::render_svg;
pub use layout::{render_chart, ChartReport, ChartSpec, Scene, Threshold};
pub use style::{builtin_styles, load_styles, Marker, StyleTable};
pub use trend::{fit_power_law, fit_series, FitThresholds, FittedTrend};
