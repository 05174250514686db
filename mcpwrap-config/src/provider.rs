//! Configuration provider using Figment

use crate::{
    discovery::{ConfigFile, ConfigFormat, FileDiscovery},
    types::{DocumentFormat, McpWrapConfig},
    ConfigResult,
};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::Serialize;
use tracing::{debug, info, trace};

/// Prefix of environment variables read into the configuration
pub const ENV_PREFIX: &str = "MCPWRAP_";

/// Values given explicitly on the command line
///
/// Each `Some` field overrides every other configuration source.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigOverrides {
    /// Overrides `server.port`
    pub port: Option<u16>,
    /// Overrides `server.host`
    pub host: Option<String>,
    /// Overrides `server.name`
    pub name: Option<String>,
    /// Overrides `server.format`
    pub format: Option<DocumentFormat>,
}

/// Configuration provider using figment
///
/// Sources are merged in precedence order (later sources override earlier ones):
/// 1. Default values
/// 2. `~/.mcpwrap/config.*`
/// 3. `<project>/.mcpwrap/config.*`
/// 4. `MCPWRAP_` environment variables, `__` separating nested keys
/// 5. Command line overrides
///
/// No caching is performed, configuration is read fresh on each load.
pub struct ConfigProvider {
    discovery: FileDiscovery,
}

impl ConfigProvider {
    /// Create a provider for the project rooted at `project_root`
    pub fn new(project_root: Option<&std::path::Path>) -> Self {
        Self {
            discovery: FileDiscovery::new(project_root),
        }
    }

    /// Create a provider over an explicit file discovery
    pub fn with_discovery(discovery: FileDiscovery) -> Self {
        Self { discovery }
    }

    /// Load and validate the configuration
    pub fn load(&self, overrides: &ConfigOverrides) -> ConfigResult<McpWrapConfig> {
        debug!("Loading configuration");

        let config: McpWrapConfig = self.build_figment(overrides).extract()?;
        config.validate()?;

        info!(
            "Loaded configuration for server '{}' targeting {}:{}",
            config.server.name, config.server.host, config.server.port
        );
        Ok(config)
    }

    fn build_figment(&self, overrides: &ConfigOverrides) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(McpWrapConfig::default()))
            .merge(self.load_discovered_config_files())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Self::load_overrides(overrides))
    }

    fn load_discovered_config_files(&self) -> Figment {
        let mut figment = Figment::new();
        for config_file in self.discovery.discover_all() {
            trace!(
                "Loading config file: {} ({:?})",
                config_file.path.display(),
                config_file.format
            );
            figment = figment.merge(Self::load_config_file(&config_file));
        }
        figment
    }

    fn load_config_file(config_file: &ConfigFile) -> Figment {
        let path = &config_file.path;
        match config_file.format {
            ConfigFormat::Toml => Figment::from(Toml::file(path)),
            ConfigFormat::Yaml => Figment::from(Yaml::file(path)),
            ConfigFormat::Json => Figment::from(Json::file(path)),
        }
    }

    fn load_overrides(overrides: &ConfigOverrides) -> Figment {
        let mut figment = Figment::new();
        if let Some(port) = overrides.port {
            figment = figment.merge(Serialized::default("server.port", port));
        }
        if let Some(ref host) = overrides.host {
            figment = figment.merge(Serialized::default("server.host", host));
        }
        if let Some(ref name) = overrides.name {
            figment = figment.merge(Serialized::default("server.name", name));
        }
        if let Some(format) = overrides.format {
            figment = figment.merge(Serialized::default("server.format", format));
        }
        figment
    }
}
