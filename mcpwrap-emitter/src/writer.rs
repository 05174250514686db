//! Scaffold rendering and writing

use crate::blank::{sample_tools, BlankServerModel};
use crate::config_doc::ConfigDocument;
use crate::engine::TemplateEngine;
use crate::error::{EmitError, Result};
use crate::model::{ReadmeModel, ServerModel};
use mcpwrap_config::ServerSettings;
use mcpwrap_schema::Tool;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SERVER_TEMPLATE: &str = include_str!("../templates/server.py.liquid");
const BLANK_SERVER_TEMPLATE: &str = include_str!("../templates/blank_server.py.liquid");
const README_TEMPLATE: &str = include_str!("../templates/README.md.liquid");
const REQUIREMENTS: &str = include_str!("../templates/requirements.txt");

pub const SERVER_FILE: &str = "server.py";
pub const README_FILE: &str = "README.md";
pub const REQUIREMENTS_FILE: &str = "requirements.txt";

/// One generated file, relative to the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub name: String,
    pub contents: String,
}

/// Every file of a scaffold, rendered but not yet written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scaffold {
    pub files: Vec<RenderedFile>,
}

impl Scaffold {
    fn push(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        self.files.push(RenderedFile {
            name: name.into(),
            contents: contents.into(),
        });
    }

    /// Contents of the file called `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.contents.as_str())
    }

    /// Write every file under `dir`, creating it if needed
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir).map_err(|e| EmitError::io(dir, e))?;
        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let path = dir.join(&file.name);
            fs::write(&path, &file.contents).map_err(|e| EmitError::io(&path, e))?;
            debug!("Wrote {} ({} bytes)", path.display(), file.contents.len());
            written.push(path);
        }
        Ok(written)
    }
}

/// Renders tools into the configuration document and proxy server
///
/// Rendering is pure: the same tools and settings always produce the same
/// bytes.
pub struct Emitter {
    engine: TemplateEngine,
    settings: ServerSettings,
}

impl Emitter {
    pub fn new(settings: ServerSettings) -> Result<Self> {
        Ok(Self {
            engine: TemplateEngine::new()?,
            settings,
        })
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// Render the proxy scaffold for `tools`
    pub fn render(&self, tools: &[Tool]) -> Result<Scaffold> {
        let settings = &self.settings;
        let mut scaffold = Scaffold::default();

        scaffold.push(
            settings.format.file_name(),
            ConfigDocument::new(settings, tools).render(settings.format)?,
        );
        scaffold.push(
            SERVER_FILE,
            self.engine.render(
                SERVER_FILE,
                SERVER_TEMPLATE,
                &ServerModel::new(tools, settings)?,
            )?,
        );
        scaffold.push(REQUIREMENTS_FILE, REQUIREMENTS);
        scaffold.push(
            README_FILE,
            self.engine.render(
                README_FILE,
                README_TEMPLATE,
                &ReadmeModel::new(tools, settings),
            )?,
        );
        Ok(scaffold)
    }

    /// Render the `init` scaffold with sample tools
    pub fn render_blank(&self) -> Result<Scaffold> {
        let settings = &self.settings;
        let tools = sample_tools();
        let mut scaffold = Scaffold::default();

        scaffold.push(
            settings.format.file_name(),
            ConfigDocument::new(settings, &tools).render(settings.format)?,
        );
        scaffold.push(
            SERVER_FILE,
            self.engine.render(
                SERVER_FILE,
                BLANK_SERVER_TEMPLATE,
                &BlankServerModel::new(settings)?,
            )?,
        );
        scaffold.push(REQUIREMENTS_FILE, REQUIREMENTS);
        Ok(scaffold)
    }

    /// Render and write the proxy scaffold; returns the files written
    pub fn emit(&self, tools: &[Tool], out_dir: &Path) -> Result<Vec<PathBuf>> {
        let written = self.render(tools)?.write_to(out_dir)?;
        info!(
            "Generated {} tools into {}",
            tools.len(),
            out_dir.display()
        );
        Ok(written)
    }

    /// Render and write the `init` scaffold
    pub fn emit_blank(&self, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let written = self.render_blank()?.write_to(out_dir)?;
        info!("Initialized blank MCP server in {}", out_dir.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpwrap_config::DocumentFormat;
    use tempfile::TempDir;

    #[test]
    fn test_empty_tool_list_still_renders() {
        let emitter = Emitter::new(ServerSettings::default()).unwrap();
        let scaffold = emitter.render(&[]).unwrap();
        let names: Vec<_> = scaffold.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["mcp.yaml", "server.py", "requirements.txt", "README.md"]
        );
        assert!(scaffold
            .get(README_FILE)
            .unwrap()
            .contains("No tools were generated."));
    }

    #[test]
    fn test_json_format_changes_document_name() {
        let settings = ServerSettings {
            format: DocumentFormat::Json,
            ..ServerSettings::default()
        };
        let emitter = Emitter::new(settings).unwrap();
        let scaffold = emitter.render(&[]).unwrap();
        assert!(scaffold.get("mcp.json").is_some());
        assert!(scaffold
            .get(SERVER_FILE)
            .unwrap()
            .contains(r#"CONFIG_PATH = Path(__file__).with_name("mcp.json")"#));
    }

    #[test]
    fn test_blank_scaffold_written() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("blank");
        let emitter = Emitter::new(ServerSettings::default()).unwrap();
        let written = emitter.emit_blank(&out).unwrap();
        assert_eq!(written.len(), 3);

        let server = fs::read_to_string(out.join(SERVER_FILE)).unwrap();
        assert!(server.contains("async def handle_hello_world(arguments):"));
        assert!(server.contains("async def handle_get_user_info(arguments):"));

        let doc = fs::read_to_string(out.join("mcp.yaml")).unwrap();
        assert!(doc.contains("hello_world"));
        assert!(doc.contains("get_user_info"));
    }

    #[test]
    fn test_write_into_file_path_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("taken");
        fs::write(&blocker, "x").unwrap();
        let emitter = Emitter::new(ServerSettings::default()).unwrap();
        let err = emitter.emit(&[], &blocker).unwrap_err();
        assert!(matches!(err, EmitError::Io { .. }));
    }
}
