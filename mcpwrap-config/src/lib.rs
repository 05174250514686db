//! mcpwrap configuration management using Figment
//!
//! Configuration is layered, later sources overriding earlier ones:
//! defaults → global → project → env → CLI.
//!
//! # Configuration Files
//!
//! - Global: `~/.mcpwrap/config.{toml,yaml,yml,json}`
//! - Project: `<project>/.mcpwrap/config.{toml,yaml,yml,json}`
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! scan:
//!   exclude_dirs: [".git", "tests"]
//!   model_bases: ["BaseModel", "Schema"]
//!
//! server:
//!   name: billing-tools
//!   port: 8080
//!   format: json
//! ```
//!
//! # Environment Variables
//!
//! Variables prefixed with `MCPWRAP_` map onto nested keys with `__`
//! as the separator, so `MCPWRAP_SERVER__PORT=9000` sets `server.port`.
//!
//! ```no_run
//! use mcpwrap_config::{load_configuration, ConfigOverrides};
//! use std::path::Path;
//!
//! let config = load_configuration(Some(Path::new(".")), &ConfigOverrides::default())?;
//! println!("proxying to {}:{}", config.server.host, config.server.port);
//! # Ok::<(), mcpwrap_config::ConfigError>(())
//! ```

pub mod discovery;
pub mod error;
pub mod provider;
pub mod types;

use std::path::Path;

pub use discovery::{ConfigFile, ConfigFormat, ConfigScope, FileDiscovery};
pub use error::{ConfigError, ConfigResult};
pub use provider::{ConfigOverrides, ConfigProvider};
pub use types::{DocumentFormat, McpWrapConfig, ScanSettings, ServerSettings};

/// Load configuration from all available sources
pub fn load_configuration(
    project_root: Option<&Path>,
    overrides: &ConfigOverrides,
) -> ConfigResult<McpWrapConfig> {
    ConfigProvider::new(project_root).load(overrides)
}
