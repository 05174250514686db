//! The extracted route model
//!
//! An [`Endpoint`] is produced once per route-annotated function and is
//! immutable afterwards. [`Shape`] records come from the model registry and
//! are attached to endpoints by name.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// HTTP verbs recognized on route annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Map a decorator attribute such as `get` in `@app.get(...)`
    pub fn from_attribute(attr: &str) -> Option<Self> {
        match attr {
            "get" => Some(Self::Get),
            "post" => Some(Self::Post),
            "put" => Some(Self::Put),
            "delete" => Some(Self::Delete),
            "patch" => Some(Self::Patch),
            "head" => Some(Self::Head),
            "options" => Some(Self::Options),
            _ => None,
        }
    }

    /// Upper-case wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }

    /// Methods that conventionally carry a request body
    pub fn carries_body(self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }

    /// Methods whose request body is mandatory
    pub fn requires_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a parameter travels in the HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    Path,
    Query,
    Body,
}

impl ParamLocation {
    /// Location implied by an argument name, if it is one of the sentinels
    pub fn from_sentinel(name: &str) -> Option<Self> {
        match name {
            "query" | "params" => Some(Self::Query),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON schema primitive a type tag maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl SchemaType {
    /// Map a normalized type tag; anything unrecognized is an object
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "str" | "string" => Self::String,
            "int" | "integer" => Self::Integer,
            "float" | "number" => Self::Number,
            "bool" | "boolean" => Self::Boolean,
            "list" | "array" => Self::Array,
            _ => Self::Object,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a type tag denotes an object-like value
///
/// Registered model names are object-like too; callers check those against
/// the registry.
pub fn is_object_tag(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "dict" | "object" | "any"
    )
}

/// One property of a [`Shape`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Kind marker of a [`Shape`]; structured records are always objects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Object,
}

/// Structural description of an object type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Name of the model this shape was registered under; `None` for the
    /// generic placeholder body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub properties: IndexMap<String, Property>,
    /// Required property names in declaration order
    pub required: Vec<String>,
}

impl Shape {
    /// An empty shape registered under `name`
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Untyped object placeholder used when a body model is unknown
    pub fn generic() -> Self {
        Self::default()
    }

    pub fn is_generic(&self) -> bool {
        self.name.is_none()
    }

    /// Add or replace a property; a replaced property keeps its position
    pub fn insert(&mut self, name: impl Into<String>, property: Property, required: bool) {
        let name = name.into();
        self.required.retain(|r| r != &name);
        if required {
            self.required.push(name.clone());
        }
        self.properties.insert(name, property);
    }
}

/// One function parameter of an [`Endpoint`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    /// Normalized type tag, e.g. `str`, `array`, `CreateUserRequest`
    #[serde(rename = "type")]
    pub type_tag: String,
    pub required: bool,
    pub location: ParamLocation,
    pub description: String,
}

/// File and line a route was declared at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub path: PathBuf,
    /// 1-based
    pub line: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.path.display(), self.line)
    }
}

/// One discovered route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub function_name: String,
    pub description: String,
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Shape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    pub tags: Vec<String>,
    pub source_location: SourceLocation,
}
