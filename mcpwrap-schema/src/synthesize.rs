//! Endpoint → tool synthesis

use crate::error::SchemaError;
use crate::naming::{tool_name, NameAllocator};
use crate::tool::{
    BoundParam, HttpBinding, InputSchema, OutputSchema, PropertySchema, Tool, BODY_FIELD,
};
use mcpwrap_common::{Diagnostic, Pretty};
use mcpwrap_scanner::{Endpoint, SchemaType};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

/// Tools in endpoint order, plus the collisions that were resolved
#[derive(Debug, Clone, Default, Serialize)]
pub struct SynthesisReport {
    pub tools: Vec<Tool>,
    pub diagnostics: Vec<Diagnostic>,
}

fn body_schema(endpoint: &Endpoint) -> Option<PropertySchema> {
    let shape = endpoint.request_body.as_ref()?;
    let schema = match &shape.name {
        None => PropertySchema::primitive(SchemaType::Object, "Request body data"),
        Some(model) => PropertySchema {
            schema_type: SchemaType::Object,
            description: format!("Request body ({model})"),
            properties: Some(shape.properties.clone()),
            required: Some(shape.required.clone()),
        },
    };
    Some(schema)
}

/// Synthesize the tool for one endpoint under its base name
pub fn synthesize_tool(endpoint: &Endpoint) -> Tool {
    let mut input = InputSchema::default();

    for param in &endpoint.parameters {
        input.properties.insert(
            param.name.clone(),
            PropertySchema::primitive(SchemaType::from_tag(&param.type_tag), &param.description),
        );
        if param.required {
            input.required.push(param.name.clone());
        }
    }

    let body = body_schema(endpoint);
    let has_body = body.is_some();
    if let Some(body) = body {
        input.properties.insert(BODY_FIELD.to_string(), body);
        if endpoint.method.requires_body() && !input.required.iter().any(|r| r == BODY_FIELD) {
            input.required.push(BODY_FIELD.to_string());
        }
    }

    let description = if endpoint.description.trim().is_empty() {
        format!("{} {}", endpoint.method, endpoint.path)
    } else {
        endpoint.description.clone()
    };

    let output_schema = endpoint.response_type.as_ref().map(|tag| OutputSchema {
        schema_type: SchemaType::from_tag(tag),
        description: format!("Response from {} {}", endpoint.method, endpoint.path),
    });

    Tool {
        name: tool_name(endpoint.method, &endpoint.path),
        description,
        input_schema: input,
        output_schema,
        binding: HttpBinding {
            method: endpoint.method,
            path: endpoint.path.clone(),
            params: endpoint
                .parameters
                .iter()
                .map(|p| BoundParam {
                    name: p.name.clone(),
                    location: p.location,
                })
                .collect(),
            has_body,
        },
    }
}

/// Synthesize tools for every endpoint with unique names
///
/// No tool is ever dropped: duplicate names are suffixed and reported.
pub fn synthesize(endpoints: &[Endpoint]) -> SynthesisReport {
    let mut tools: Vec<Tool> = endpoints.iter().map(synthesize_tool).collect();
    let mut allocator = NameAllocator::new(tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>());
    let mut diagnostics = Vec::new();

    for (tool, endpoint) in tools.iter_mut().zip(endpoints) {
        let name = allocator.claim(&tool.name);
        if name != tool.name {
            let finding = SchemaError::NameCollision {
                name: tool.name.clone(),
                renamed: name.clone(),
                method: endpoint.method.to_string(),
                path: endpoint.path.clone(),
            };
            warn!("{}: {}", endpoint.source_location, finding);
            diagnostics.push(Diagnostic::from_error(
                endpoint.source_location.to_string(),
                &finding,
            ));
            tool.name = name;
        }
        trace!("Synthesized tool: {}", Pretty(&*tool));
    }

    debug!("{} name collisions resolved", diagnostics.len());
    info!("Synthesized {} tools", tools.len());
    SynthesisReport { tools, diagnostics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpwrap_scanner::{
        HttpMethod, ParamLocation, Parameter, Property, Shape, SourceLocation,
    };
    use std::path::PathBuf;

    fn endpoint(method: HttpMethod, path: &str) -> Endpoint {
        Endpoint {
            path: path.to_string(),
            method,
            function_name: "handler".to_string(),
            description: String::new(),
            parameters: Vec::new(),
            request_body: None,
            response_type: None,
            tags: Vec::new(),
            source_location: SourceLocation {
                path: PathBuf::from("main.py"),
                line: 1,
            },
        }
    }

    fn param(name: &str, type_tag: &str, required: bool, location: ParamLocation) -> Parameter {
        Parameter {
            name: name.to_string(),
            type_tag: type_tag.to_string(),
            required,
            location,
            description: format!("{location} parameter: {name}"),
        }
    }

    fn create_user_shape() -> Shape {
        let mut shape = Shape::named("CreateUserRequest");
        shape.insert(
            "name",
            Property {
                schema_type: SchemaType::String,
                description: None,
            },
            true,
        );
        shape.insert(
            "age",
            Property {
                schema_type: SchemaType::Integer,
                description: None,
            },
            false,
        );
        shape
    }

    #[test]
    fn test_get_user_tool() {
        let mut ep = endpoint(HttpMethod::Get, "/users/{user_id}");
        ep.parameters.push(param("user_id", "int", true, ParamLocation::Path));
        ep.parameters.push(param("verbose", "bool", false, ParamLocation::Path));
        ep.response_type = Some("dict".to_string());

        let tool = synthesize_tool(&ep);
        assert_eq!(tool.name, "getUsersByUserId");
        assert_eq!(tool.description, "GET /users/{user_id}");
        assert_eq!(tool.input_schema.required, vec!["user_id"]);
        assert_eq!(
            tool.input_schema.properties["user_id"],
            PropertySchema::primitive(SchemaType::Integer, "path parameter: user_id")
        );
        assert_eq!(
            tool.output_schema,
            Some(OutputSchema {
                schema_type: SchemaType::Object,
                description: "Response from GET /users/{user_id}".to_string(),
            })
        );
        assert!(!tool.binding.has_body);
    }

    #[test]
    fn test_post_with_model_body_requires_body_field() {
        let mut ep = endpoint(HttpMethod::Post, "/users");
        ep.description = "Create a user".to_string();
        ep.parameters
            .push(param("user", "CreateUserRequest", true, ParamLocation::Body));
        ep.request_body = Some(create_user_shape());

        let tool = synthesize_tool(&ep);
        assert_eq!(tool.name, "postUsers");
        assert_eq!(tool.description, "Create a user");
        assert_eq!(tool.input_schema.required, vec!["user", "body"]);

        let body = &tool.input_schema.properties["body"];
        assert_eq!(body.schema_type, SchemaType::Object);
        let props = body.properties.as_ref().unwrap();
        assert_eq!(props["name"].schema_type, SchemaType::String);
        assert_eq!(props["age"].schema_type, SchemaType::Integer);
        assert_eq!(body.required.as_deref(), Some(&["name".to_string()][..]));
        assert!(tool.binding.has_body);
    }

    #[test]
    fn test_patch_body_is_optional_and_generic() {
        let mut ep = endpoint(HttpMethod::Patch, "/items/{id}");
        ep.parameters.push(param("id", "int", true, ParamLocation::Path));
        ep.parameters.push(param("changes", "dict", true, ParamLocation::Body));
        ep.request_body = Some(Shape::generic());

        let tool = synthesize_tool(&ep);
        assert_eq!(tool.input_schema.required, vec!["id", "changes"]);
        let body = &tool.input_schema.properties["body"];
        assert_eq!(body.description, "Request body data");
        assert!(body.properties.is_none());
    }

    #[test]
    fn test_parameter_named_body_is_not_duplicated() {
        let mut ep = endpoint(HttpMethod::Put, "/blob");
        ep.parameters.push(param("body", "dict", true, ParamLocation::Body));
        ep.request_body = Some(Shape::generic());

        let tool = synthesize_tool(&ep);
        assert_eq!(tool.input_schema.properties.len(), 1);
        assert_eq!(tool.input_schema.required, vec!["body"]);
    }

    #[test]
    fn test_required_subset_of_properties() {
        let mut post = endpoint(HttpMethod::Post, "/orders/{order_id}/lines");
        post.parameters.push(param("order_id", "int", true, ParamLocation::Path));
        post.parameters.push(param("dry_run", "bool", false, ParamLocation::Query));
        post.parameters.push(param("line", "Line", true, ParamLocation::Body));
        post.request_body = Some(Shape::generic());
        let bare_post = endpoint(HttpMethod::Post, "/ping");

        for tool in synthesize(&[post, bare_post]).tools {
            for name in &tool.input_schema.required {
                assert!(
                    tool.input_schema.properties.contains_key(name),
                    "{} requires missing {}",
                    tool.name,
                    name
                );
            }
        }
    }

    #[test]
    fn test_collisions_renamed_not_dropped() {
        let endpoints = vec![
            endpoint(HttpMethod::Get, "/users/{id}"),
            endpoint(HttpMethod::Get, "/users/{ID}"),
            endpoint(HttpMethod::Get, "/health"),
            endpoint(HttpMethod::Get, "/users/{i_d}"),
        ];
        let report = synthesize(&endpoints);
        let names: Vec<_> = report.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["getUsersById", "getUsersByID", "getHealth", "getUsersByID2"]
        );
        assert_eq!(report.diagnostics.len(), 1);
        assert!(report.diagnostics[0].message.contains("getUsersByID2"));
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let mut ep = endpoint(HttpMethod::Post, "/users");
        ep.parameters
            .push(param("user", "CreateUserRequest", true, ParamLocation::Body));
        ep.request_body = Some(create_user_shape());
        let endpoints = vec![ep.clone(), ep];

        assert_eq!(synthesize(&endpoints).tools, synthesize(&endpoints).tools);
    }
}
