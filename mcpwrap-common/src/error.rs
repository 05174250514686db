//! Error classification shared across mcpwrap
//!
//! Each crate defines its own error enum and implements [`Severity`] for it.
//! Failures that the pipeline recovers from (an unparseable file, a route
//! whose path cannot be resolved) are not raised; they are recorded as
//! [`Diagnostic`] entries and reported alongside the results.

use serde::Serialize;
use std::fmt;

/// Severity levels for error classification
///
/// - **Warning**: the affected unit was skipped, everything else proceeds.
/// - **Error**: an operation failed but the run can continue.
/// - **Critical**: the run cannot continue.
///
/// # Examples
///
/// ```rust
/// use mcpwrap_common::ErrorSeverity;
///
/// // A file that fails to parse is skipped
/// let parse_failure = ErrorSeverity::Warning;
///
/// // The scan root does not exist
/// let missing_root = ErrorSeverity::Critical;
/// assert!(missing_root > parse_failure);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,

    /// Operation failed but system can continue
    Error,

    /// System cannot continue
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorSeverity::Warning => "warning",
            ErrorSeverity::Error => "error",
            ErrorSeverity::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Trait for error types that have severity levels
///
/// All mcpwrap error types implement this trait so callers can decide
/// whether to abort, skip, or merely report.
///
/// # Example
///
/// ```rust
/// use mcpwrap_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum MyError {
///     RootMissing,
///     Unparseable,
/// }
///
/// impl Severity for MyError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             MyError::RootMissing => ErrorSeverity::Critical,
///             MyError::Unparseable => ErrorSeverity::Warning,
///         }
///     }
/// }
///
/// assert!(MyError::RootMissing.is_fatal());
/// assert!(!MyError::Unparseable.is_fatal());
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;

    /// Whether this error must stop the run
    fn is_fatal(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

/// A recovered failure, kept for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// How bad it was
    pub severity: ErrorSeverity,
    /// File path, `path:line`, or a tool name, depending on the stage
    pub location: String,
    /// Human readable message
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic from any error that carries a severity
    pub fn from_error<E>(location: impl Into<String>, error: &E) -> Self
    where
        E: Severity + fmt::Display,
    {
        Self {
            severity: error.severity(),
            location: location.into(),
            message: error.to_string(),
        }
    }

    /// Build a warning-level diagnostic
    pub fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Warning,
            location: location.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.location, self.message)
    }
}
