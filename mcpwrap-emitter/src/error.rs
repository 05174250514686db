//! Error types for scaffold emission

use mcpwrap_common::{ErrorSeverity, Severity};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for emitter operations
pub type Result<T> = std::result::Result<T, EmitError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EmitError {
    /// A bundled template failed to parse
    #[error("Template '{name}' is invalid: {message}")]
    Template { name: String, message: String },

    /// A template failed to render against its model
    #[error("Failed to render '{name}': {message}")]
    Render { name: String, message: String },

    /// A model or document could not be serialized
    #[error("Serialization failed: {0}")]
    Serialize(String),

    /// Writing the output tree failed
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EmitError {
    pub fn template(name: impl Into<String>, message: impl ToString) -> Self {
        Self::Template {
            name: name.into(),
            message: message.to_string(),
        }
    }

    pub fn render(name: impl Into<String>, message: impl ToString) -> Self {
        Self::Render {
            name: name.into(),
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for EmitError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialize(error.to_string())
    }
}

impl From<serde_yaml_ng::Error> for EmitError {
    fn from(error: serde_yaml_ng::Error) -> Self {
        Self::Serialize(error.to_string())
    }
}

impl Severity for EmitError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // Bundled templates are part of the binary; a broken one is a build defect
            EmitError::Template { .. } => ErrorSeverity::Critical,
            EmitError::Render { .. } | EmitError::Serialize(_) | EmitError::Io { .. } => {
                ErrorSeverity::Error
            }
        }
    }
}
