//! Synthesis findings
//!
//! Synthesis itself cannot fail; collisions are resolved by renaming and
//! reported through these variants.

use mcpwrap_common::{ErrorSeverity, Severity};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// Two endpoints produced the same tool name
    #[error("Tool name '{name}' is already taken, {method} {path} renamed to '{renamed}'")]
    NameCollision {
        name: String,
        renamed: String,
        method: String,
        path: String,
    },
}

impl Severity for SchemaError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            SchemaError::NameCollision { .. } => ErrorSeverity::Warning,
        }
    }
}
