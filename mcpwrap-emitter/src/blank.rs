//! Sample tools for `mcpwrap init`

use crate::error::Result;
use mcpwrap_config::ServerSettings;
use mcpwrap_scanner::SchemaType;
use mcpwrap_schema::{InputSchema, PropertySchema};
use serde::Serialize;

/// A tool entry with no HTTP endpoint behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleTool {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

/// `hello_world` and `get_user_info`
pub fn sample_tools() -> Vec<SampleTool> {
    let mut hello = InputSchema::default();
    hello.properties.insert(
        "name".to_string(),
        PropertySchema::primitive(SchemaType::String, "Name to greet"),
    );

    let mut user = InputSchema::default();
    user.properties.insert(
        "user_id".to_string(),
        PropertySchema::primitive(SchemaType::Integer, "ID of the user to look up"),
    );
    user.required.push("user_id".to_string());

    vec![
        SampleTool {
            name: "hello_world".to_string(),
            description: "Return a greeting".to_string(),
            input_schema: hello,
        },
        SampleTool {
            name: "get_user_info".to_string(),
            description: "Return information about a user".to_string(),
            input_schema: user,
        },
    ]
}

/// Model of the blank `server.py`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlankServerModel {
    pub name: String,
    pub name_literal: String,
    pub config_file: String,
    pub config_file_literal: String,
}

impl BlankServerModel {
    pub fn new(settings: &ServerSettings) -> Result<Self> {
        let config_file = settings.format.file_name().to_string();
        Ok(Self {
            name: settings.name.replace(|c: char| c.is_control(), " "),
            name_literal: serde_json::to_string(&settings.name)?,
            config_file_literal: serde_json::to_string(&config_file)?,
            config_file,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_tools() {
        let tools = sample_tools();
        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["hello_world", "get_user_info"]);
        assert_eq!(tools[1].input_schema.required, vec!["user_id"]);
        assert!(tools[0].input_schema.required.is_empty());
    }
}
