//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Text or JSON console output
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use rkboot::logging::init_logging;
//! use rkboot::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log the bootstrap of an entry
///
/// # Example
///
/// ```no_run
/// use rkboot::log_entry_bootstrap;
///
/// log_entry_bootstrap!("GinEntry", "public");
/// ```
#[macro_export]
macro_rules! log_entry_bootstrap {
    ($kind:expr, $name:expr) => {
        tracing::info!(
            kind = %$kind,
            name = %$name,
            "Bootstrapping entry"
        );
    };
}

/// Log the interruption of an entry
///
/// # Example
///
/// ```no_run
/// use rkboot::log_entry_interrupt;
///
/// log_entry_interrupt!("GinEntry", "public");
/// ```
#[macro_export]
macro_rules! log_entry_interrupt {
    ($kind:expr, $name:expr) => {
        tracing::info!(
            kind = %$kind,
            name = %$name,
            "Interrupting entry"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use rkboot::log_error_with_context;
/// use rkboot::domain::BootError;
///
/// let error = BootError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::BootError;

    #[test]
    fn test_macros_expand() {
        let error = BootError::Lifecycle("late hook".to_string());
        crate::log_entry_bootstrap!("GinEntry", "public");
        crate::log_entry_interrupt!(String::from("GinEntry"), "public");
        crate::log_error_with_context!(&error, "Shutdown failed");
    }
}
