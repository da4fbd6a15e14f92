//! Configuration and constants for the CLI.

/// Current summary schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Default directory for rendered charts
pub const DEFAULT_CHART_DIR: &str = "imgs";

/// Default directory for summary tables
pub const DEFAULT_RESULTS_DIR: &str = "results";

// Log axes are padded multiplicatively: [min / margin, max * margin]
pub const DEFAULT_X_LOG_MARGIN: f64 = 1.5;
pub const DEFAULT_Y_LOG_MARGIN: f64 = 3.0;

/// Fraction of the data range added above a linear axis
pub const LINEAR_AXIS_HEADROOM: f64 = 0.05;

/// The cone extends to this multiple of the largest x in the dataset
pub const CONE_X_MAX_FACTOR: f64 = 3.0;

/// Sample count used to draw cone boundaries on linear axes
pub const CONE_SAMPLES: usize = 32;

/// Chart canvas size in pixels
pub const DEFAULT_CHART_WIDTH: usize = 600;
pub const DEFAULT_CHART_HEIGHT: usize = 400;

/// Colour used for algorithms missing from the style table
pub const FALLBACK_COLOR: &str = "#000000";

/// Suffixes stripped from an algorithm name before colour lookup
pub const STRIPPED_SUFFIXES: &[&str] = &["-noprune"];

// Cell values that mean "missing"
pub const MISSING_CELL_VALUES: &[&str] = &["", "NA", "NaN", "nan", "-"];

// Values of the exit_status column that mean the run succeeded
pub const SUCCESS_STATUS_VALUES: &[&str] = &["ok", "0"];

// Header names for each raw column (the benchmark harness uses the short forms)
pub const ALGORITHM_COLUMN_NAMES: &[&str] = &["algorithm", "alg", "algo"];
pub const VARIANT_RANK_COLUMN_NAMES: &[&str] = &["variant_rank", "r"];
pub const MAX_MATCH_COST_COLUMN_NAMES: &[&str] = &["m"];
pub const K_COLUMN_NAMES: &[&str] = &["k"];
pub const SEQUENCE_LENGTH_COLUMN_NAMES: &[&str] = &["sequence_length", "n"];
pub const ERROR_RATE_COLUMN_NAMES: &[&str] = &["error_rate", "e"];
pub const ELAPSED_COLUMN_NAMES: &[&str] = &["elapsed_seconds", "s"];
pub const PAIR_COUNT_COLUMN_NAMES: &[&str] = &["pair_count", "nr"];
pub const TRIAL_COUNT_COLUMN_NAMES: &[&str] = &["trial_count", "cnt"];
pub const PEAK_MEMORY_COLUMN_NAMES: &[&str] = &["peak_memory_kb", "max_uss"];
pub const EXIT_STATUS_COLUMN_NAMES: &[&str] = &["exit_status"];
pub const STATES_EXPANDED_COLUMN_NAMES: &[&str] = &["states_expanded", "expanded"];
pub const STATES_EXPLORED_COLUMN_NAMES: &[&str] = &["states_explored", "explored"];
pub const PRECOMPUTE_TIME_COLUMN_NAMES: &[&str] = &["precompute_time", "precom"];
pub const ALIGN_TIME_COLUMN_NAMES: &[&str] = &["align_time", "align"];
pub const PRUNE_TIME_COLUMN_NAMES: &[&str] = &["prune_time", "prune"];
pub const HEURISTIC_VALUE_COLUMN_NAMES: &[&str] = &["heuristic_value", "h0"];
pub const EDIT_DISTANCE_COLUMN_NAMES: &[&str] = &["edit_distance", "ed"];

/// Algorithms in the order they appear in charts and tables
pub const DEFAULT_ALGORITHM_ORDER: &[&str] =
    &["dijkstra", "edlib", "wfa", "biwfa", "sh", "csh", "sh-noprune", "csh-noprune"];
