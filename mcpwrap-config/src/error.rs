//! Error types for the mcpwrap configuration system

use mcpwrap_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration parsing failed
    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[source]
        source: Box<figment::Error>,
    },

    /// Home directory could not be determined
    #[error("Unable to determine home directory")]
    HomeDirectoryNotFound,

    /// Invalid configuration value
    #[error("Invalid configuration value for key '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::ParseError {
            source: Box::new(error),
        }
    }
}

impl Severity for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // A broken config file or value leaves nothing sensible to run with
            ConfigError::ParseError { .. } => ErrorSeverity::Critical,
            ConfigError::InvalidValue { .. } => ErrorSeverity::Critical,
            // Global configuration is optional
            ConfigError::HomeDirectoryNotFound => ErrorSeverity::Warning,
        }
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_value_message() {
        let err = ConfigError::invalid_value("server.port", "must be greater than zero");
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for key 'server.port': must be greater than zero"
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_home_is_not_fatal() {
        assert_eq!(
            ConfigError::HomeDirectoryNotFound.severity(),
            ErrorSeverity::Warning
        );
    }
}
