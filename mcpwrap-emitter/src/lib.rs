//! Scaffold emission
//!
//! Turns synthesized [`mcpwrap_schema::Tool`]s into an output directory:
//!
//! - `mcp.yaml` or `mcp.json`, the declarative tool list
//! - `server.py`, a Python MCP server with one proxy handler per tool
//! - `requirements.txt` and `README.md`
//!
//! Tools are first lowered into plain render models ([`model`]), which the
//! bundled liquid templates then turn into text.

pub mod blank;
pub mod config_doc;
pub mod engine;
pub mod error;
pub mod model;
pub mod writer;

pub use blank::{sample_tools, SampleTool};
pub use config_doc::ConfigDocument;
pub use engine::TemplateEngine;
pub use error::{EmitError, Result};
pub use model::{HandlerModel, Placeholder, ReadmeModel, ServerModel};
pub use writer::{Emitter, RenderedFile, Scaffold, README_FILE, REQUIREMENTS_FILE, SERVER_FILE};
