//! Error types for the route scanner
//!
//! Only [`ScanError::PathNotFound`] and [`ScanError::NoSourceFiles`] abort a
//! scan. Everything else is absorbed at the smallest enclosing unit (a file,
//! a class, a function, a single argument) and recorded as a diagnostic.

use mcpwrap_common::{ErrorSeverity, Severity};
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// Result type alias for scanner operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Error types for scanner operations
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum ScanError {
    /// Scan root does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Scan root contains nothing that can be parsed
    #[error("No source files found under {0}")]
    NoSourceFiles(PathBuf),

    /// A single file failed to parse
    #[error("Parse error in {path}: {message}")]
    ParseFailure {
        /// The file path
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A sub-step of model or route extraction failed
    #[error("Could not extract {unit}: {message}")]
    ExtractionFailure {
        /// The unit that was omitted, e.g. `function create_user`
        unit: String,
        /// Error message
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Severity for ScanError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // Critical: nothing to scan
            ScanError::PathNotFound(_) => ErrorSeverity::Critical,
            ScanError::NoSourceFiles(_) => ErrorSeverity::Critical,

            // Warning: the unit is skipped, the scan carries on
            ScanError::ParseFailure { .. } => ErrorSeverity::Warning,
            ScanError::ExtractionFailure { .. } => ErrorSeverity::Warning,

            ScanError::Io(_) => ErrorSeverity::Error,
        }
    }
}

impl ScanError {
    /// Create a parse failure
    pub fn parse_failure(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ScanError::ParseFailure {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an extraction failure
    pub fn extraction_failure(unit: impl Into<String>, message: impl Into<String>) -> Self {
        ScanError::ExtractionFailure {
            unit: unit.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_kinds() {
        assert!(ScanError::PathNotFound(PathBuf::from("/nope")).is_fatal());
        assert!(ScanError::NoSourceFiles(PathBuf::from("/empty")).is_fatal());
    }

    #[test]
    fn test_recovered_kinds() {
        let parse = ScanError::parse_failure("app.py", "syntax error at line 3");
        assert_eq!(parse.severity(), ErrorSeverity::Warning);
        assert_eq!(parse.to_string(), "Parse error in app.py: syntax error at line 3");

        let extraction = ScanError::extraction_failure("function broken", "unsupported parameter");
        assert_eq!(extraction.severity(), ErrorSeverity::Warning);
        assert_eq!(
            extraction.to_string(),
            "Could not extract function broken: unsupported parameter"
        );
    }

    #[test]
    fn test_io_is_error() {
        let err: ScanError = std::io::Error::other("denied").into();
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }
}
