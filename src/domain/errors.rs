//! Domain error types
//!
//! This module defines the error hierarchy for rkboot. All errors are
//! domain-specific and don't expose third-party types in their variants.

use thiserror::Error;

/// Main rkboot error type
///
/// This is the primary error type used throughout the crate.
#[derive(Debug, Error)]
pub enum BootError {
    /// Boot document could not be located, read or validated
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Override grammar errors (CLI flag or environment)
    #[error("Override error: {0}")]
    Override(#[from] OverrideError),

    /// Resolved configuration could not be decoded into the requested type
    #[error("Decode error in '{section}': {message}")]
    Decode { section: String, message: String },

    /// An entry failed to bootstrap
    #[error("Entry {kind}/{name} failed: {message}")]
    Entry {
        kind: String,
        name: String,
        message: String,
    },

    /// Lifecycle coordination errors
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl BootError {
    /// Builds an [`BootError::Entry`] for the given entry coordinates
    pub fn entry(kind: impl Into<String>, name: impl Into<String>, message: impl Into<String>) -> Self {
        BootError::Entry {
            kind: kind.into(),
            name: name.into(),
            message: message.into(),
        }
    }

    /// Builds a [`BootError::Decode`] for the given section
    pub fn decode(section: impl Into<String>, message: impl Into<String>) -> Self {
        BootError::Decode {
            section: section.into(),
            message: message.into(),
        }
    }
}

/// Override grammar errors
///
/// Raised by the `path=value` grammar parser. The environment normalizer
/// downgrades these to warnings; an explicit CLI override string treats them
/// as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    /// Malformed assignment or path segment
    #[error("invalid assignment '{assignment}': {reason}")]
    Syntax { assignment: String, reason: String },

    /// The same path was assigned incompatible structures in one parse
    #[error("conflicting assignment at '{path}': {reason}")]
    Conflict { path: String, reason: String },
}

impl OverrideError {
    pub(crate) fn syntax(assignment: impl Into<String>, reason: impl Into<String>) -> Self {
        OverrideError::Syntax {
            assignment: assignment.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn conflict(path: impl Into<String>, reason: impl Into<String>) -> Self {
        OverrideError::Conflict {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for BootError {
    fn from(err: std::io::Error) -> Self {
        BootError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for BootError {
    fn from(err: serde_json::Error) -> Self {
        BootError::Serialization(err.to_string())
    }
}

// Conversion from YAML parse errors
impl From<serde_yaml::Error> for BootError {
    fn from(err: serde_yaml::Error) -> Self {
        BootError::Configuration(format!("YAML parse error: {err}"))
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BootError {
    fn from(err: toml::de::Error) -> Self {
        BootError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_error_display() {
        let err = BootError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_override_error_conversion() {
        let err = OverrideError::syntax("a.b", "missing '='");
        let boot_err: BootError = err.into();
        assert!(matches!(boot_err, BootError::Override(_)));
        assert_eq!(
            boot_err.to_string(),
            "Override error: invalid assignment 'a.b': missing '='"
        );
    }

    #[test]
    fn test_entry_error_display() {
        let err = BootError::entry("CertEntry", "tls", "no such file");
        assert_eq!(err.to_string(), "Entry CertEntry/tls failed: no such file");
    }

    #[test]
    fn test_decode_error_display() {
        let err = BootError::decode("gin", "invalid type: map, expected u16");
        assert!(err.to_string().contains("'gin'"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let boot_err: BootError = io_err.into();
        assert!(matches!(boot_err, BootError::Io(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("a: [unclosed").unwrap_err();
        let boot_err: BootError = yaml_err.into();
        assert!(matches!(boot_err, BootError::Configuration(_)));
        assert!(boot_err.to_string().contains("YAML parse error"));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let boot_err: BootError = toml_err.into();
        assert!(matches!(boot_err, BootError::Configuration(_)));
        assert!(boot_err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_boot_error_implements_std_error() {
        let err = BootError::Validation("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
