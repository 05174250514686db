//! Core data structures for mcpwrap configuration

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cap on the size of a single scanned file (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Fully resolved configuration for one mcpwrap run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct McpWrapConfig {
    /// How the source tree is walked and what counts as a model
    pub scan: ScanSettings,
    /// What the generated server is called and where the proxied API lives
    pub server: ServerSettings,
}

impl McpWrapConfig {
    /// Reject values that would make the pipeline produce nonsense
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::invalid_value(
                "scan.extensions",
                "at least one source file extension is required",
            ));
        }
        if self.scan.max_file_size == 0 {
            return Err(ConfigError::invalid_value(
                "scan.max_file_size",
                "must be greater than zero",
            ));
        }
        if self.server.name.trim().is_empty() {
            return Err(ConfigError::invalid_value("server.name", "must not be empty"));
        }
        if self.server.port == 0 {
            return Err(ConfigError::invalid_value(
                "server.port",
                "must be greater than zero",
            ));
        }
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::invalid_value("server.host", "must not be empty"));
        }
        Ok(())
    }
}

/// Source tree walking and model recognition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// File extensions (without the dot) that are parsed
    pub extensions: Vec<String>,
    /// Directory names that are never descended into
    pub exclude_dirs: Vec<String>,
    /// Files larger than this many bytes are skipped
    pub max_file_size: u64,
    /// Honor `.gitignore` files while walking
    pub respect_gitignore: bool,
    /// Base class names that mark a class as a structured record
    pub model_bases: Vec<String>,
    /// Decorator names that mark a class as a structured record
    pub model_decorators: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["py".to_string()],
            exclude_dirs: [
                ".git",
                "__pycache__",
                ".venv",
                "venv",
                "node_modules",
                "dist",
                "build",
                ".tox",
                "site-packages",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            respect_gitignore: true,
            model_bases: vec!["BaseModel".to_string(), "TypedDict".to_string()],
            model_decorators: vec!["dataclass".to_string()],
        }
    }
}

/// Settings for the generated MCP server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server name written into the configuration document
    pub name: String,
    /// Server description written into the configuration document
    pub description: String,
    /// Server version written into the configuration document
    pub version: String,
    /// Port the proxied HTTP API listens on
    pub port: u16,
    /// Host the proxied HTTP API listens on
    pub host: String,
    /// Format of the configuration document
    pub format: DocumentFormat,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            name: "generated-mcp-server".to_string(),
            description: "Auto-generated MCP server from FastAPI endpoints".to_string(),
            version: "1.0.0".to_string(),
            port: 8000,
            host: "localhost".to_string(),
            format: DocumentFormat::Yaml,
        }
    }
}

/// Serialization format of the emitted configuration document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// `mcp.yaml`
    #[default]
    Yaml,
    /// `mcp.json`
    Json,
}

impl DocumentFormat {
    /// File name of the configuration document in this format
    pub fn file_name(self) -> &'static str {
        match self {
            DocumentFormat::Yaml => "mcp.yaml",
            DocumentFormat::Json => "mcp.json",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Yaml => f.write_str("yaml"),
            DocumentFormat::Json => f.write_str("json"),
        }
    }
}
