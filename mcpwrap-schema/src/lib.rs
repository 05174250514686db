//! MCP tool schema synthesis
//!
//! Maps each scanned [`mcpwrap_scanner::Endpoint`] onto exactly one [`Tool`]:
//! a deterministic name, a description, an object input schema and an
//! optional output schema. Tools also carry the [`HttpBinding`] the emitter
//! needs to forward calls back to the original route.

pub mod error;
pub mod naming;
pub mod synthesize;
pub mod tool;

pub use error::SchemaError;
pub use naming::{placeholder_name, tool_name, NameAllocator};
pub use synthesize::{synthesize, synthesize_tool, SynthesisReport};
pub use tool::{
    BoundParam, HttpBinding, InputSchema, OutputSchema, PropertySchema, Tool, BODY_FIELD,
};
