//! Protocol-facing tool descriptors

use indexmap::IndexMap;
use mcpwrap_scanner::{HttpMethod, ParamLocation, Property, SchemaType};
use serde::Serialize;

/// Name of the single input field that carries the request body
pub const BODY_FIELD: &str = "body";

/// One entry of `inputSchema.properties`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    pub description: String,
    /// Fields of a structured request body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Property>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
}

impl PropertySchema {
    pub fn primitive(schema_type: SchemaType, description: impl Into<String>) -> Self {
        Self {
            schema_type,
            description: description.into(),
            properties: None,
            required: None,
        }
    }
}

/// Object schema of a tool's arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    pub properties: IndexMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl Default for InputSchema {
    fn default() -> Self {
        Self {
            schema_type: SchemaType::Object,
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    pub description: String,
}

/// An argument the generated handler forwards, and where to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundParam {
    pub name: String,
    pub location: ParamLocation,
}

/// How a tool call maps back onto the original HTTP route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpBinding {
    pub method: HttpMethod,
    pub path: String,
    pub params: Vec<BoundParam>,
    /// Whether the tool has a [`BODY_FIELD`] input
    pub has_body: bool,
}

/// A synthesized tool, one per endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<OutputSchema>,
    /// Not part of the declarative document; drives handler generation
    #[serde(skip)]
    pub binding: HttpBinding,
}
