//! Costing configuration loaded from config.toml
//!
//! The `[defaults]` tables seed every newly created finished good with fixed costs,
//! overhead loadings and channel markups. A missing file falls back to the built-in
//! standard overheads; a file that exists but does not parse is an error.

use crate::{
    core::costing::LineDefaults,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Starting values for new finished goods
    #[serde(default)]
    pub defaults: LineDefaults,
}

/// Loads costing configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value has the wrong type
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the configuration named by `BOM_BUDDY_CONFIG` (or `./config.toml`).
///
/// A missing file is not an error: the built-in defaults are used instead.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("BOM_BUDDY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config_or_default(path)
}

/// Loads `path` if it exists, otherwise returns the built-in defaults.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using built-in costing defaults");
        return Ok(Config::default());
    }

    let config = load_config(path)?;
    info!(
        path = %path.display(),
        blended_overhead = ?config.defaults.overheads.blended(),
        "loaded costing defaults"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::costing::Overheads;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_costing_config() {
        let toml_str = r#"
            [defaults.fixed_costs]
            stitching = 12.5

            [defaults.overheads]
            rejection = 3
            QC = 0.5
            machine_maintainance = 1.5

            [defaults.markups]
            B2B = 10.0
            d2c = 25
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        let defaults = config.defaults;
        assert_eq!(defaults.fixed_costs.stitching, dec!(12.5));
        assert_eq!(defaults.fixed_costs.printing, Decimal::ZERO);
        assert_eq!(defaults.overheads.rejection, dec!(3));
        assert_eq!(defaults.overheads.qc, dec!(0.5));
        assert_eq!(defaults.overheads.machine_maintainance, dec!(1.5));
        // Fields left out of a given table are zero.
        assert_eq!(defaults.overheads.shipping, Decimal::ZERO);
        assert_eq!(defaults.markups.b2b, dec!(10));
        assert_eq!(defaults.markups.d2c, dec!(25));
    }

    #[test]
    fn test_missing_overheads_table_uses_standard() {
        let config: Config = toml::from_str("[defaults.markups]\nB2B = 5.0\n").unwrap();
        assert_eq!(config.defaults.overheads, Overheads::standard());
        assert_eq!(config.defaults.markups.b2b, dec!(5));
    }

    #[test]
    fn test_empty_file_uses_standard() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.defaults, LineDefaults::default());
    }

    #[test]
    fn test_bundled_config_matches_standard_overheads() {
        let config = load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml")).unwrap();
        assert_eq!(config.defaults.overheads, Overheads::standard());
        assert_eq!(config.defaults.overheads.blended(), Some(dec!(15)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = load_config_or_default("does/not/exist.toml").unwrap();
        assert_eq!(config.defaults, LineDefaults::default());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result: std::result::Result<Config, _> = toml::from_str("[defaults.overheads]\nQC = \"lots\"\n");
        assert!(result.is_err());

        let missing = load_config("does/not/exist.toml");
        assert!(matches!(missing.unwrap_err(), Error::Config { message: _ }));
    }
}
