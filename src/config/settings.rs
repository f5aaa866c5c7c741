//! Settings loading from stockroom.toml
//!
//! Every field has a default, so a missing settings file is not an error: the
//! warehouse simply runs with the built-in threshold, supplier tracking enabled
//! and an empty reference catalog. The catalog sections seed the `categories`
//! and `suppliers` tables on startup.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default location of the settings file
pub const DEFAULT_SETTINGS_PATH: &str = "stockroom.toml";

/// Configuration structure representing the entire stockroom.toml file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Aggregated quantities strictly below this value raise a low-stock alert
    pub low_stock_threshold: i64,
    /// Whether the supplier is part of a product's identity
    pub track_suppliers: bool,
    /// Store connect/acquire timeout in seconds
    pub connect_timeout_secs: u64,
    /// Directory stock-take exports are written to
    pub report_dir: PathBuf,
    /// Categories to seed
    pub categories: Vec<CategorySeed>,
    /// Suppliers to seed
    pub suppliers: Vec<SupplierSeed>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            low_stock_threshold: 5,
            track_suppliers: true,
            connect_timeout_secs: 10,
            report_dir: PathBuf::from("."),
            categories: Vec::new(),
            suppliers: Vec::new(),
        }
    }
}

/// A category listed in the settings file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct CategorySeed {
    /// Category name
    pub name: String,
}

/// A supplier listed in the settings file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SupplierSeed {
    /// Supplier name
    pub name: String,
    /// Tax identification number
    #[serde(default)]
    pub tax_id: String,
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid or a field has the wrong type
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    debug!("Attempting to load settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read settings file {}: {e}", path_ref.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path_ref.display()),
    })
}

/// Loads settings from `path`, falling back to defaults when the file does not exist.
///
/// A file that exists but cannot be parsed is still an error.
pub fn load_settings_or_default<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    if path_ref.exists() {
        load_settings(path_ref)
    } else {
        info!(
            "Settings file {} not found, using defaults.",
            path_ref.display()
        );
        Ok(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_settings() {
        let toml_str = r#"
            low_stock_threshold = 3
            track_suppliers = false
            report_dir = "exports"

            [[categories]]
            name = "Electronics"

            [[categories]]
            name = "Chemicals"

            [[suppliers]]
            name = "AcmeCo"
            tax_id = "PL1234567890"
        "#;

        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.low_stock_threshold, 3);
        assert!(!settings.track_suppliers);
        assert_eq!(settings.connect_timeout_secs, 10);
        assert_eq!(settings.report_dir, PathBuf::from("exports"));
        assert_eq!(settings.categories.len(), 2);
        assert_eq!(settings.categories[1].name, "Chemicals");
        assert_eq!(settings.suppliers[0].tax_id, "PL1234567890");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.low_stock_threshold, 5);
        assert!(settings.track_suppliers);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = load_settings_or_default("does-not-exist/stockroom.toml").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_missing_file_is_error_for_strict_load() {
        let result = load_settings("does-not-exist/stockroom.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_wrong_type_is_config_error() {
        let result: std::result::Result<Settings, _> =
            toml::from_str("low_stock_threshold = \"five\"");
        assert!(result.is_err());
    }
}
