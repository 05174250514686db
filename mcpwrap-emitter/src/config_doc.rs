//! The declarative MCP configuration document (`mcp.yaml` / `mcp.json`)

use crate::error::Result;
use mcpwrap_config::{DocumentFormat, ServerSettings};
use serde::Serialize;

const YAML_HEADER: &str = "\
# MCP server configuration generated by mcpwrap
#
# Each entry under `tools` proxies one HTTP endpoint of the scanned API.
# server.py reads this file at startup to advertise the tools, so edits to
# descriptions or schemas take effect on the next restart. Re-running
# `mcpwrap scan` overwrites this file.
";

/// `{ name, description, version, tools }`
#[derive(Debug, Serialize)]
pub struct ConfigDocument<'a, T: Serialize> {
    pub name: &'a str,
    pub description: &'a str,
    pub version: &'a str,
    pub tools: &'a [T],
}

impl<'a, T: Serialize> ConfigDocument<'a, T> {
    pub fn new(settings: &'a ServerSettings, tools: &'a [T]) -> Self {
        Self {
            name: &settings.name,
            description: &settings.description,
            version: &settings.version,
            tools,
        }
    }

    /// Serialize in `format`; YAML output starts with an explanatory header
    pub fn render(&self, format: DocumentFormat) -> Result<String> {
        match format {
            DocumentFormat::Yaml => {
                let body = serde_yaml_ng::to_string(self)?;
                Ok(format!("{YAML_HEADER}\n{body}"))
            }
            DocumentFormat::Json => {
                let mut body = serde_json::to_string_pretty(self)?;
                body.push('\n');
                Ok(body)
            }
        }
    }
}
