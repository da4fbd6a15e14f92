//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod figures;
pub mod models;
pub mod plot;
pub mod table;
pub mod utils;

// Re-export main command functions
pub use figures::{execute_figures, load_manifest};
pub use models::{FigureEntry, FigureManifest, PlotArgs, TableArgs};
pub use plot::{execute_plot, render_charts, select_rows};
pub use table::execute_table;
pub use utils::{display_version, resolve_styles, validate_benchmark_file};
