//! TOML configuration file support for the `nexus` command.
//!
//! Reduction and encoding settings can live in a file instead of flags. Flags
//! given on the command line take precedence over the file:
//!
//! ```toml
//! # mite.toml
//! [reduction]
//! window_width = 4
//! window_height = 2
//! min_iterations = 1
//! max_cells = 99990
//! normalization = "window-area"
//!
//! [encoding]
//! keep_constant_columns = false
//! quartiles = "global"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mite::corpus::QuartileScope;
use mite::reduce::ThresholdNormalization;

/// Root configuration structure for mite.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Reduction settings.
    #[serde(default)]
    pub reduction: ReductionSection,

    /// Character encoding settings.
    #[serde(default)]
    pub encoding: EncodingSection,
}

/// Window reduction parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ReductionSection {
    /// Window width in m/z cells.
    pub window_width: Option<usize>,

    /// Window height in retention time cells.
    pub window_height: Option<usize>,

    /// Iterations performed regardless of the cell budget.
    pub min_iterations: Option<usize>,

    /// Cell budget shared by the regions of a partition.
    pub max_cells: Option<usize>,

    /// Denominator of the binary window threshold.
    pub normalization: Option<ThresholdNormalization>,
}

/// Character matrix parameters.
#[derive(Debug, Default, Deserialize)]
pub struct EncodingSection {
    /// Keep characters identical across every taxon.
    pub keep_constant_columns: Option<bool>,

    /// Quartile cut points for non-binary maps.
    pub quartiles: Option<QuartileScope>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [reduction]
            window_width = 4
            window_height = 2
            min_iterations = 1
            max_cells = 5000
            normalization = "row-count-squared"

            [encoding]
            keep_constant_columns = true
            quartiles = "local"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.reduction.window_width, Some(4));
        assert_eq!(config.reduction.window_height, Some(2));
        assert_eq!(config.reduction.min_iterations, Some(1));
        assert_eq!(config.reduction.max_cells, Some(5_000));
        assert_eq!(
            config.reduction.normalization,
            Some(ThresholdNormalization::RowCountSquared)
        );
        assert_eq!(config.encoding.keep_constant_columns, Some(true));
        assert_eq!(config.encoding.quartiles, Some(QuartileScope::Local));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [reduction]
            window_width = 3
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.reduction.window_width, Some(3));
        assert_eq!(config.reduction.window_height, None);
        assert_eq!(config.encoding.quartiles, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.reduction.max_cells, None);
    }

    #[test]
    fn test_unknown_normalization_is_rejected() {
        let toml = r#"
            [reduction]
            normalization = "diagonal"
        "#;
        assert!(Config::from_str(toml).is_err());
    }
}
