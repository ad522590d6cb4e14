//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// File name looked up inside the configuration directory.
pub const CONFIG_FILE_NAME: &str = "engine.yaml";

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// └── engine.yaml   # organization, server, leave, reports, currency
/// ```
///
/// # Example
///
/// ```no_run
/// use hr_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Organization: {}", loader.config().organization.name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns `ConfigNotFound` if `engine.yaml` is missing and
    /// `ConfigParseError` if it is not valid YAML for [`EngineConfig`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let config_path = path.as_ref().join(CONFIG_FILE_NAME);
        let config = Self::load_yaml(&config_path)?;
        Ok(Self { config })
    }

    /// Parses configuration from a YAML string. `origin` names the source in
    /// error messages.
    pub fn from_yaml_str(content: &str, origin: &str) -> EngineResult<Self> {
        let config = serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { config })
    }

    fn load_yaml(path: &Path) -> EngineResult<EngineConfig> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Ok(Self::from_yaml_str(&content, &path_str)?.config)
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_path() -> &'static str {
        "./config/default"
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let config = result.unwrap().into_config();
        assert_eq!(config.organization.name, "Acme Corporation");
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.reports.trailing_months, 6);
        assert_eq!(config.leave.default_balance.sick_leave, 12);
        assert_eq!(config.currency.code, "INR");
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("engine.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let loader = ConfigLoader::from_yaml_str("organization:\n  name: Tiny\n", "inline").unwrap();
        let config = loader.config();

        assert_eq!(config.organization.name, "Tiny");
        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.reports.trailing_months, 6);
        assert_eq!(config.leave.default_balance.paid_leave, 0);
        assert_eq!(config.currency.symbol, "₹");
        assert_eq!(config.currency.fraction_digits, 0);
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("organization: [unclosed", "inline");

        match result {
            Err(EngineError::ConfigParseError { path, .. }) => assert_eq!(path, "inline"),
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_organization_is_a_parse_error() {
        let result = ConfigLoader::from_yaml_str("reports:\n  trailing_months: 3\n", "inline");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_opening_balance_copies_allowance() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let user_id = uuid::Uuid::new_v4();
        let balance = loader
            .config()
            .leave
            .default_balance
            .opening_balance(user_id);

        assert_eq!(balance.user_id, user_id);
        assert_eq!(balance.paid_leave, 18);
        assert_eq!(balance.casual_leave, 8);
        assert_eq!(balance.unpaid_leave, 0);
    }
}
