//! Configuration file discovery
//!
//! Looks for `config.{toml,yaml,yml,json}` in the global `~/.mcpwrap/`
//! directory and in the project's `.mcpwrap/` directory. Global files come
//! first so that project files override them when merged.

use crate::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

/// Name of the configuration directory, both global and per project
pub const CONFIG_DIR_NAME: &str = ".mcpwrap";

const FILE_CANDIDATES: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];

/// A discovered configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Full path to the configuration file
    pub path: PathBuf,
    /// Detected format of the file
    pub format: ConfigFormat,
    /// Where the file was found
    pub scope: ConfigScope,
}

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (.toml extension)
    Toml,
    /// YAML format (.yaml or .yml extensions)
    Yaml,
    /// JSON format (.json extension)
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Configuration scope indicating where the file was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigScope {
    /// `~/.mcpwrap/`
    Global,
    /// `<project>/.mcpwrap/`
    Project,
}

/// Resolve `~/.mcpwrap`
pub fn global_config_dir() -> ConfigResult<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME))
        .ok_or(ConfigError::HomeDirectoryNotFound)
}

/// File discovery over the global and project configuration directories
#[derive(Debug, Clone, Default)]
pub struct FileDiscovery {
    project_dir: Option<PathBuf>,
    global_dir: Option<PathBuf>,
}

impl FileDiscovery {
    /// Discover files for a project rooted at `project_root`
    ///
    /// A missing home directory only disables global configuration.
    pub fn new(project_root: Option<&Path>) -> Self {
        let global_dir = match global_config_dir() {
            Ok(dir) => Some(dir),
            Err(e) => {
                debug!("Global configuration disabled: {}", e);
                None
            }
        };
        Self {
            project_dir: project_root.map(|root| root.join(CONFIG_DIR_NAME)),
            global_dir,
        }
    }

    /// Discover files in explicit directories
    pub fn with_dirs(project_dir: Option<PathBuf>, global_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            global_dir,
        }
    }

    /// Discover all configuration files, lowest precedence first
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        let mut files = Vec::new();

        if let Some(ref dir) = self.global_dir {
            files.extend(search_directory(dir, ConfigScope::Global));
        }
        if let Some(ref dir) = self.project_dir {
            files.extend(search_directory(dir, ConfigScope::Project));
        }

        debug!("Discovered {} configuration files", files.len());
        files
    }
}

fn search_directory(dir: &Path, scope: ConfigScope) -> Vec<ConfigFile> {
    if !dir.exists() {
        trace!("Directory does not exist: {}", dir.display());
        return Vec::new();
    }
    if !dir.is_dir() {
        warn!("Path exists but is not a directory: {}", dir.display());
        return Vec::new();
    }

    FILE_CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .filter(|candidate| candidate.is_file())
        .filter_map(|path| {
            let format = ConfigFormat::from_extension(path.extension()?.to_str()?)?;
            trace!("Found config: {} ({:?})", path.display(), format);
            Some(ConfigFile {
                path,
                format,
                scope,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_extension() {
        assert_eq!(ConfigFormat::from_extension("YML"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("ini"), None);
    }

    #[test]
    fn test_global_files_precede_project_files() {
        let global = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(global.path().join("config.yaml"), "server:\n  port: 1\n").unwrap();
        fs::write(project.path().join("config.toml"), "[server]\nport = 2\n").unwrap();
        fs::write(project.path().join("notes.txt"), "ignored").unwrap();

        let discovery = FileDiscovery::with_dirs(
            Some(project.path().to_path_buf()),
            Some(global.path().to_path_buf()),
        );
        let files = discovery.discover_all();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].scope, ConfigScope::Global);
        assert_eq!(files[0].format, ConfigFormat::Yaml);
        assert_eq!(files[1].scope, ConfigScope::Project);
        assert_eq!(files[1].format, ConfigFormat::Toml);
    }

    #[test]
    fn test_missing_directories_yield_nothing() {
        let temp = TempDir::new().unwrap();
        let discovery = FileDiscovery::with_dirs(Some(temp.path().join("absent")), None);
        assert!(discovery.discover_all().is_empty());
    }
}
