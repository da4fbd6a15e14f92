//! Colour, marker and display-name lookup for chart series.
//!
//! The built-in table is created once per process and never mutated; callers
//! can also load an alternative table from TOML and pass it to the renderer.

use crate::aggregator::grouping::{GroupKey, Grouping};
use crate::utils::config::{DEFAULT_ALGORITHM_ORDER, FALLBACK_COLOR, STRIPPED_SUFFIXES};
use crate::utils::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Marker shape drawn at each data point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Circle,
    Triangle,
    Square,
}

/// Visual encoding of series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleTable {
    /// Algorithm -> colour (hex)
    pub colors: BTreeMap<String, String>,

    /// Algorithm -> pretty name
    pub names: BTreeMap<String, String>,

    /// Canonical display order of algorithms
    pub order: Vec<String>,

    /// Colour for algorithms missing from `colors`
    pub fallback_color: String,

    /// Suffixes removed before colour lookup (e.g. "-noprune")
    pub strip_suffixes: Vec<String>,

    /// Algorithms always drawn with circles, whatever their rank
    pub circle_algorithms: Vec<String>,
}

impl Default for StyleTable {
    fn default() -> Self {
        let colors = [
            ("dijkstra", "#5F2001"),
            ("sh", "#E8480C"),
            ("csh", "#317D32"),
            ("edlib", "#DE4AFF"),
            ("wfa", "#625AFF"),
            ("biwfa", "#625AFF"),
        ];
        let names = [
            ("dijkstra", "Dijkstra"),
            ("sh", "SH"),
            ("csh", "CSH"),
            ("sh-noprune", "SH (no prune)"),
            ("csh-noprune", "CSH (no prune)"),
            ("edlib", "Edlib"),
            ("wfa", "WFA"),
            ("biwfa", "BiWFA"),
        ];

        Self {
            colors: to_map(&colors),
            names: to_map(&names),
            order: DEFAULT_ALGORITHM_ORDER.iter().map(|s| s.to_string()).collect(),
            fallback_color: FALLBACK_COLOR.to_string(),
            strip_suffixes: STRIPPED_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            circle_algorithms: vec!["dijkstra".to_string()],
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// The built-in style table, shared by the whole process
pub fn builtin_styles() -> &'static StyleTable {
    static STYLES: OnceLock<StyleTable> = OnceLock::new();
    STYLES.get_or_init(StyleTable::default)
}

/// Load a style table from TOML; omitted sections keep built-in values
///
/// # Errors
/// * `ConfigurationError::IoError` - file cannot be read
/// * `ConfigurationError::TomlParseFailed` - invalid TOML
pub fn load_styles(path: impl AsRef<Path>) -> Result<StyleTable, ConfigurationError> {
    let contents = fs::read_to_string(path)?;
    let styles: StyleTable = toml::from_str(&contents)?;
    Ok(styles)
}

impl StyleTable {
    /// Algorithm name with known suffixes removed
    fn base_name<'a>(&self, algorithm: &'a str) -> &'a str {
        self.strip_suffixes
            .iter()
            .find_map(|suffix| algorithm.strip_suffix(suffix.as_str()))
            .unwrap_or(algorithm)
    }

    /// Colour from the table, without fallback
    pub fn color_for(&self, algorithm: &str) -> Option<&str> {
        self.colors
            .get(self.base_name(algorithm))
            .map(String::as_str)
    }

    /// Colour for an algorithm; unknown algorithms get the fixed fallback
    pub fn color(&self, algorithm: &str) -> &str {
        self.color_for(algorithm).unwrap_or(&self.fallback_color)
    }

    pub fn marker(&self, key: &GroupKey) -> Marker {
        if self.circle_algorithms.contains(&key.algorithm) {
            return Marker::Circle;
        }
        match key.variant_rank {
            Some(1) => Marker::Triangle,
            Some(2) => Marker::Square,
            _ => Marker::Circle,
        }
    }

    /// Pretty algorithm name; unknown names are shown verbatim
    pub fn display_name<'a>(&'a self, algorithm: &'a str) -> &'a str {
        self.names
            .get(algorithm)
            .map(String::as_str)
            .unwrap_or(algorithm)
    }

    /// Series label: pretty name plus variant suffix
    pub fn label(&self, key: &GroupKey, grouping: Grouping) -> String {
        format!(
            "{}{}",
            self.display_name(&key.algorithm),
            key.suffix(grouping)
        )
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_strips_suffix() {
        let styles = StyleTable::default();
        assert_eq!(styles.color("csh-noprune"), styles.color("csh"));
        assert_eq!(styles.color("sh"), "#E8480C");
    }

    #[test]
    fn test_unknown_algorithm_uses_fallback() {
        let styles = StyleTable::default();
        assert_eq!(styles.color_for("mystery"), None);
        assert_eq!(styles.color("mystery"), FALLBACK_COLOR);
        assert_eq!(styles.color("mystery"), styles.color("mystery"));
    }

    #[test]
    fn test_markers() {
        let styles = StyleTable::default();
        assert_eq!(styles.marker(&GroupKey::new("dijkstra").with_rank(1)), Marker::Circle);
        assert_eq!(styles.marker(&GroupKey::new("sh").with_rank(1)), Marker::Triangle);
        assert_eq!(styles.marker(&GroupKey::new("sh").with_rank(2)), Marker::Square);
        assert_eq!(styles.marker(&GroupKey::new("sh")), Marker::Circle);
    }

    #[test]
    fn test_labels() {
        let styles = StyleTable::default();
        let key = GroupKey::new("csh").with_rank(1);
        assert_eq!(styles.label(&key, Grouping::AlgorithmRank), "CSH (exact)");
        assert_eq!(styles.label(&key, Grouping::Algorithm), "CSH");
        assert_eq!(styles.display_name("sh-noprune"), "SH (no prune)");
        assert_eq!(styles.display_name("other"), "other");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let styles: StyleTable = toml::from_str(
            r##"
            fallback_color = "#777777"
            [colors]
            astar = "#123456"
            "##,
        )
        .unwrap();

        assert_eq!(styles.color("astar"), "#123456");
        assert_eq!(styles.color("sh"), "#777777");
        assert_eq!(styles.order, StyleTable::default().order);
    }
}
