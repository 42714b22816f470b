//! Configuration schema types
//!
//! Typed views of the boot document sections the core itself consumes.
//! Adapter sections (`gin`, `cert`, ...) are decoded by their registrars and
//! ignored here.

use serde::{Deserialize, Serialize};

/// Core sections of the boot document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootConfig {
    /// Application description (`app` section)
    #[serde(default)]
    pub app: AppInfoConfig,

    /// Logging configuration (`logging` section)
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BootConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.app.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfoConfig {
    /// Service name, also recorded on the registry
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Service version
    #[serde(default = "default_app_version")]
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub home_url: String,

    #[serde(default)]
    pub docs_url: Vec<String>,

    #[serde(default)]
    pub maintainers: Vec<String>,
}

impl AppInfoConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("app.name must not be empty".to_string());
        }
        Ok(())
    }
}

impl Default for AppInfoConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
            description: String::new(),
            keywords: Vec::new(),
            home_url: String::new(),
            docs_url: Vec::new(),
            maintainers: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Console format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(format!(
                "Invalid logging.format '{}'. Must be one of: {}",
                self.format,
                valid_formats.join(", ")
            ));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "rkboot".to_string()
}

fn default_app_version() -> String {
    "local".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BootConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.app.name, "rkboot");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_app_config_validation() {
        let mut config = AppInfoConfig::default();
        assert!(config.validate().is_ok());

        config.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.level = "DEBUG".to_string();
        assert!(config.validate().is_ok());

        config.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.level = "info".to_string();
        config.format = "xml".to_string();
        assert!(config.validate().is_err());

        config.format = "json".to_string();
        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());

        config.local_rotation = "hourly".to_string();
        config.local_enabled = true;
        config.local_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_document() {
        let config: BootConfig =
            serde_yaml::from_str("app:\n  name: greeter\n  keywords: [demo]\ngin: []\n").unwrap();
        assert_eq!(config.app.name, "greeter");
        assert_eq!(config.app.version, "local");
        assert_eq!(config.app.keywords, vec!["demo".to_string()]);
        assert!(!config.logging.local_enabled);
    }
}
