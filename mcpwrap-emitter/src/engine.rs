//! Liquid template engine
//!
//! Templates are bundled into the binary; each one renders against a
//! serializable model converted into a liquid object.

use crate::error::{EmitError, Result};
use serde::Serialize;

/// Template engine with a standard-library liquid parser
pub struct TemplateEngine {
    parser: liquid::Parser,
}

impl TemplateEngine {
    /// Create a new template engine with default configuration
    pub fn new() -> Result<Self> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| EmitError::template("<parser>", e))?;
        Ok(Self { parser })
    }

    /// Render `source` with the fields of `model` as globals
    pub fn render<T: Serialize>(&self, name: &str, source: &str, model: &T) -> Result<String> {
        let template = self
            .parser
            .parse(source)
            .map_err(|e| EmitError::template(name, e))?;
        let globals =
            liquid::model::to_object(model).map_err(|e| EmitError::Serialize(e.to_string()))?;
        template
            .render(&globals)
            .map_err(|e| EmitError::render(name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Greeting {
        greeting: String,
        names: Vec<String>,
    }

    #[test]
    fn test_render_model_fields() {
        let engine = TemplateEngine::new().unwrap();
        let model = Greeting {
            greeting: "Hello".to_string(),
            names: vec!["a".to_string(), "b".to_string()],
        };
        let result = engine
            .render(
                "greeting",
                "{{ greeting }}{% for n in names %} {{ n }}{% endfor %}!",
                &model,
            )
            .unwrap();
        assert_eq!(result, "Hello a b!");
    }

    #[test]
    fn test_render_empty() {
        let engine = TemplateEngine::new().unwrap();
        let model = Greeting {
            greeting: String::new(),
            names: Vec::new(),
        };
        assert_eq!(engine.render("empty", "", &model).unwrap(), "");
    }

    #[test]
    fn test_invalid_template_reports_name() {
        let engine = TemplateEngine::new().unwrap();
        let model = Greeting {
            greeting: String::new(),
            names: Vec::new(),
        };
        let err = engine
            .render("broken.py", "{% for x in %}", &model)
            .unwrap_err();
        assert!(matches!(err, EmitError::Template { ref name, .. } if name == "broken.py"));
    }
}
