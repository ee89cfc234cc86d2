//! Catalog configuration loading from config.toml
//!
//! Built-in transaction categories are always seeded. Operators can declare extra
//! ledger categories (e.g. "Insurance") in `config.toml`; they are seeded as plain
//! ledger categories on startup.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the catalog section of config.toml
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    /// Extra transaction categories to seed
    #[serde(default)]
    pub transaction_categories: Vec<CategoryConfig>,
}

/// Configuration for a single extra transaction category
#[derive(Debug, Deserialize, Clone)]
pub struct CategoryConfig {
    /// Category name
    pub name: String,
    /// Whether the category is an expense
    pub is_expense: bool,
}

/// Loads catalog configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse catalog file: {e}"),
    })
}

/// Loads the catalog if the file exists, falling back to an empty catalog otherwise.
pub fn load_catalog_or_default<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    if path.as_ref().exists() {
        load_catalog(path)
    } else {
        tracing::debug!(path = ?path.as_ref(), "No catalog file, using built-in catalog only");
        Ok(CatalogConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_catalog_config() {
        let toml_str = r#"
            [[transaction_categories]]
            name = "Insurance"
            is_expense = true

            [[transaction_categories]]
            name = "Parking Fee"
            is_expense = false
        "#;

        let config: CatalogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.transaction_categories.len(), 2);
        assert_eq!(config.transaction_categories[0].name, "Insurance");
        assert!(config.transaction_categories[0].is_expense);
        assert!(!config.transaction_categories[1].is_expense);
    }

    #[test]
    fn test_empty_catalog_config() {
        let config: CatalogConfig = toml::from_str("").unwrap();
        assert!(config.transaction_categories.is_empty());
    }

    #[test]
    fn test_missing_catalog_file_falls_back() {
        let config = load_catalog_or_default("definitely/not/here.toml").unwrap();
        assert!(config.transaction_categories.is_empty());
    }
}
