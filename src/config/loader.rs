//! YAML configuration file loading

use crate::{
    error::{AppError, Result},
    models::SuiteConfig,
};
use std::path::Path;

/// Read and parse a suite configuration file.
///
/// An empty document yields an empty configuration.
pub fn load_suite_config(path: &Path) -> Result<SuiteConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AppError::config(format!("failed to read config file {}: {}", path.display(), e))
    })?;

    parse_suite_config(&content)
        .map_err(|e| AppError::parse(format!("failed to parse {}: {}", path.display(), e)))
}

/// Parse a suite configuration from YAML text
pub fn parse_suite_config(content: &str) -> std::result::Result<SuiteConfig, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(SuiteConfig::default());
    }
    serde_yaml::from_str(content)
}
