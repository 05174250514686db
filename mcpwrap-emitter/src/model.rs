//! Render models for the generated Python sources
//!
//! Everything a template needs is computed here as plain data, with string
//! values already encoded as Python literals, so that tests can assert on
//! the model instead of diffing generated source.

use crate::error::Result;
use mcpwrap_config::ServerSettings;
use mcpwrap_scanner::ParamLocation;
use mcpwrap_schema::{placeholder_name, Tool, BODY_FIELD};
use serde::Serialize;

/// Encode a serializable value as a Python literal
///
/// JSON strings and arrays of strings are valid Python literals.
fn py_literal<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Turn a tool name into a valid Python function name
pub fn python_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    format!("handle_{ident}")
}

/// Flatten control characters so a value is safe inside a `#` comment
fn comment_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// One `{placeholder}` in a route path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placeholder {
    /// Full text including braces, e.g. `{file_path:path}`
    pub text: String,
    /// Argument that fills it
    pub argument: String,
    /// Characters `quote` leaves unescaped
    pub safe: String,
}

/// Placeholders of a path in order of appearance
pub fn path_placeholders(path: &str) -> Vec<Placeholder> {
    let mut placeholders = Vec::new();
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let inner = &rest[open + 1..open + close];
        let converter = inner.split_once(':').map(|(_, c)| c.trim());
        placeholders.push(Placeholder {
            text: rest[open..=open + close].to_string(),
            argument: placeholder_name(inner).to_string(),
            safe: if converter == Some("path") { "/" } else { "" }.to_string(),
        });
        rest = &rest[open + close + 1..];
    }
    placeholders
}

/// Handler for one tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerModel {
    pub tool_name: String,
    pub function_name: String,
    /// `METHOD path` for the handler's comment line
    pub route: String,
    pub method_literal: String,
    pub tool_literal: String,
    pub path_literal: String,
    /// Python list of `[text, argument, safe]` triples
    pub placeholders_literal: String,
    /// Python list of argument names sent as the query string
    pub query_literal: String,
    /// Python list of argument names that may carry the payload
    pub body_literal: String,
    pub has_body: bool,
    #[serde(skip)]
    pub placeholders: Vec<Placeholder>,
    #[serde(skip)]
    pub query: Vec<String>,
    #[serde(skip)]
    pub body: Vec<String>,
}

impl HandlerModel {
    /// Route each bound argument to the path, the query string or the payload
    ///
    /// Path-located arguments without a matching placeholder travel as query
    /// parameters so they still reach the API. Body-located arguments always
    /// form the payload, with the `body` field taking precedence.
    pub fn from_tool(tool: &Tool) -> Result<Self> {
        let binding = &tool.binding;
        let placeholders = path_placeholders(&binding.path);

        let mut query = Vec::new();
        let mut body = Vec::new();
        for param in &binding.params {
            match param.location {
                ParamLocation::Body => body.push(param.name.clone()),
                ParamLocation::Query => query.push(param.name.clone()),
                ParamLocation::Path => {
                    if !placeholders.iter().any(|p| p.argument == param.name) {
                        query.push(param.name.clone());
                    }
                }
            }
        }
        if binding.has_body {
            body.retain(|name| name != BODY_FIELD);
            body.insert(0, BODY_FIELD.to_string());
        }

        let triples: Vec<[&str; 3]> = placeholders
            .iter()
            .map(|p| [p.text.as_str(), p.argument.as_str(), p.safe.as_str()])
            .collect();

        Ok(Self {
            tool_name: tool.name.clone(),
            function_name: python_identifier(&tool.name),
            route: comment_text(&format!("{} {}", binding.method, binding.path)),
            method_literal: py_literal(binding.method.as_str())?,
            tool_literal: py_literal(&tool.name)?,
            path_literal: py_literal(&binding.path)?,
            placeholders_literal: py_literal(&triples)?,
            query_literal: py_literal(&query)?,
            body_literal: py_literal(&body)?,
            has_body: !body.is_empty(),
            placeholders,
            query,
            body,
        })
    }
}

/// Model of the proxy `server.py`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerModel {
    pub name: String,
    pub name_literal: String,
    pub base_url: String,
    pub base_url_literal: String,
    pub config_file: String,
    pub config_file_literal: String,
    pub handlers: Vec<HandlerModel>,
}

impl ServerModel {
    pub fn new(tools: &[Tool], settings: &ServerSettings) -> Result<Self> {
        let base_url = format!("http://{}:{}", settings.host, settings.port);
        let config_file = settings.format.file_name().to_string();
        Ok(Self {
            name: comment_text(&settings.name),
            name_literal: py_literal(&settings.name)?,
            base_url_literal: py_literal(&base_url)?,
            base_url,
            config_file_literal: py_literal(&config_file)?,
            config_file,
            handlers: tools
                .iter()
                .map(HandlerModel::from_tool)
                .collect::<Result<_>>()?,
        })
    }
}

/// One line of the README tool table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub route: String,
    pub description: String,
}

/// Model of the generated `README.md`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadmeModel {
    pub name: String,
    pub description: String,
    pub base_url: String,
    pub config_file: String,
    pub server_path: String,
    pub has_tools: bool,
    pub tools: Vec<ToolSummary>,
}

impl ReadmeModel {
    pub fn new(tools: &[Tool], settings: &ServerSettings) -> Self {
        Self {
            name: settings.name.clone(),
            description: settings.description.clone(),
            base_url: format!("http://{}:{}", settings.host, settings.port),
            config_file: settings.format.file_name().to_string(),
            server_path: "server.py".to_string(),
            has_tools: !tools.is_empty(),
            tools: tools
                .iter()
                .map(|tool| ToolSummary {
                    name: tool.name.clone(),
                    route: format!("{} {}", tool.binding.method, tool.binding.path),
                    description: comment_text(
                        tool.description.lines().next().unwrap_or_default(),
                    ),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpwrap_scanner::HttpMethod;
    use mcpwrap_schema::{BoundParam, HttpBinding, InputSchema};
    use rstest::rstest;

    fn tool(method: HttpMethod, path: &str, params: &[(&str, ParamLocation)], body: bool) -> Tool {
        Tool {
            name: mcpwrap_schema::tool_name(method, path),
            description: String::new(),
            input_schema: InputSchema::default(),
            output_schema: None,
            binding: HttpBinding {
                method,
                path: path.to_string(),
                params: params
                    .iter()
                    .map(|(name, location)| BoundParam {
                        name: name.to_string(),
                        location: *location,
                    })
                    .collect(),
                has_body: body,
            },
        }
    }

    #[rstest]
    #[case("getUsersByUserId", "handle_getUsersByUserId")]
    #[case("get-odd name", "handle_get_odd_name")]
    #[case("2fa", "handle__2fa")]
    fn test_python_identifier(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(python_identifier(name), expected);
    }

    #[test]
    fn test_path_placeholders_with_converter() {
        let placeholders = path_placeholders("/files/{file_path:path}/v/{version}");
        assert_eq!(
            placeholders,
            vec![
                Placeholder {
                    text: "{file_path:path}".to_string(),
                    argument: "file_path".to_string(),
                    safe: "/".to_string(),
                },
                Placeholder {
                    text: "{version}".to_string(),
                    argument: "version".to_string(),
                    safe: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_arguments_routed_by_location() {
        let t = tool(
            HttpMethod::Get,
            "/users/{user_id}",
            &[
                ("user_id", ParamLocation::Path),
                ("verbose", ParamLocation::Path),
                ("query", ParamLocation::Query),
            ],
            false,
        );
        let handler = HandlerModel::from_tool(&t).unwrap();
        assert_eq!(handler.placeholders[0].argument, "user_id");
        assert_eq!(handler.query, vec!["verbose", "query"]);
        assert!(handler.body.is_empty());
        assert!(!handler.has_body);
        assert_eq!(handler.query_literal, r#"["verbose","query"]"#);
        assert_eq!(handler.placeholders_literal, r#"[["{user_id}","user_id",""]]"#);
    }

    #[test]
    fn test_body_field_comes_first() {
        let t = tool(
            HttpMethod::Post,
            "/users",
            &[("user", ParamLocation::Body)],
            true,
        );
        let handler = HandlerModel::from_tool(&t).unwrap();
        assert_eq!(handler.body, vec!["body", "user"]);
        assert!(handler.has_body);
        assert_eq!(handler.method_literal, r#""POST""#);
    }

    #[test]
    fn test_literals_escape_quotes() {
        let t = tool(HttpMethod::Get, "/say/\"hi\"", &[], false);
        let handler = HandlerModel::from_tool(&t).unwrap();
        assert_eq!(handler.path_literal, r#""/say/\"hi\"""#);
    }

    #[test]
    fn test_server_model_base_url() {
        let settings = ServerSettings {
            port: 9000,
            ..ServerSettings::default()
        };
        let model = ServerModel::new(&[], &settings).unwrap();
        assert_eq!(model.base_url, "http://localhost:9000");
        assert_eq!(model.config_file, "mcp.yaml");
        assert!(model.handlers.is_empty());
    }
}
