//! CLI definition for the mcpwrap command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mcpwrap_config::{ConfigOverrides, DocumentFormat};

/// Format of the generated configuration document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// mcp.yaml
    Yaml,
    /// mcp.json
    Json,
}

impl From<FormatArg> for DocumentFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Yaml => DocumentFormat::Yaml,
            FormatArg::Json => DocumentFormat::Json,
        }
    }
}

/// Settings that override configuration files and environment variables.
#[derive(clap::Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct ServerArgs {
    /// Port the scanned API listens on
    #[arg(short, long)]
    pub port: Option<u16>,
    /// Host the scanned API listens on
    #[arg(long)]
    pub host: Option<String>,
    /// Name of the generated MCP server
    #[arg(short, long)]
    pub name: Option<String>,
    /// Configuration document format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

impl ServerArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            host: self.host.clone(),
            name: self.name.clone(),
            format: self.format.map(DocumentFormat::from),
        }
    }
}

/// mcpwrap - turn a Python web API into an MCP server
///
/// Scans FastAPI-style route handlers without running them and generates a
/// Python MCP server whose tools proxy to the original endpoints.
#[derive(Parser, Debug)]
#[command(name = "mcpwrap")]
#[command(version)]
#[command(about = "Generate MCP servers from Python web API source")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a source tree and generate the MCP server scaffold
    Scan {
        /// Root directory (or single file) of the API source
        path: PathBuf,
        /// Directory the scaffold is written to
        #[arg(short, long, default_value = "mcp-server")]
        output: PathBuf,
        #[command(flatten)]
        server: ServerArgs,
    },
    /// Scan a source tree and print the endpoints and tools as JSON
    Endpoints {
        /// Root directory (or single file) of the API source
        path: PathBuf,
    },
    /// Generate a blank MCP server with sample tools
    Init {
        /// Directory the scaffold is written to
        #[arg(default_value = "mcp-server")]
        output: PathBuf,
        /// Name of the generated MCP server
        #[arg(short, long)]
        name: Option<String>,
        /// Configuration document format
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },
}
