//! Route extractor (pass 2)
//!
//! Turns route-annotated top-level functions into [`Endpoint`] records. Each
//! sub-step (path, parameters, request body, response type) fails on its
//! own: a broken parameter drops that parameter, a broken return annotation
//! drops the response type, and neither stops the rest of the function or
//! the rest of the file.

use crate::annotation::{resolved_type_tag, AliasMap};
use crate::endpoint::{Endpoint, HttpMethod, ParamLocation, Parameter, Shape, SourceLocation};
use crate::error::{Result, ScanError};
use crate::registry::{module_aliases, ModelRegistry};
use crate::syntax::{BinOp, Expr, FStringPart, FunctionDef, Keyword, Module, Param, ParamKind, Stmt};
use mcpwrap_common::{Diagnostic, Pretty};
use tracing::{debug, trace, warn};

/// Endpoints and recovered failures of one module
#[derive(Debug, Default)]
pub struct Extraction {
    pub endpoints: Vec<Endpoint>,
    pub diagnostics: Vec<Diagnostic>,
}

/// The recognized route annotation of a function
struct RouteAnnotation<'f> {
    method: HttpMethod,
    args: &'f [Expr],
    keywords: &'f [Keyword],
}

impl<'f> RouteAnnotation<'f> {
    /// First decorator of the form `<anything>.<verb>(...)`
    fn find(func: &'f FunctionDef) -> Option<Self> {
        func.decorators.iter().find_map(|decorator| {
            let Expr::Call {
                func: callee,
                args,
                keywords,
            } = decorator
            else {
                return None;
            };
            let Expr::Attribute { attr, .. } = callee.as_ref() else {
                return None;
            };
            HttpMethod::from_attribute(attr).map(|method| RouteAnnotation {
                method,
                args,
                keywords,
            })
        })
    }

    fn keyword(&self, name: &str) -> Option<&'f Expr> {
        self.keywords
            .iter()
            .find(|k| k.name == name)
            .map(|k| &k.value)
    }

    fn path_argument(&self) -> Option<&'f Expr> {
        self.args.first().or_else(|| self.keyword("path"))
    }
}

/// Resolve a route path expression
///
/// In order: string literal; f-string, with every embedded expression
/// replaced by a `{name}` placeholder; `+` concatenation of two resolvable
/// operands; bare identifier as a single `{identifier}` placeholder.
/// Anything else is unresolvable.
pub fn resolve_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Str(path) => Some(path.clone()),
        Expr::FString(parts) => Some(
            parts
                .iter()
                .map(|part| match part {
                    FStringPart::Literal(text) => text.clone(),
                    FStringPart::Interpolation(inner) => {
                        format!("{{{}}}", inner.last_name().unwrap_or("variable"))
                    }
                })
                .collect(),
        ),
        Expr::BinOp {
            left,
            op: BinOp::Add,
            right,
        } => Some(resolve_path(left)? + &resolve_path(right)?),
        Expr::Name(identifier) => Some(format!("{{{identifier}}}")),
        Expr::Attribute { .. }
        | Expr::Call { .. }
        | Expr::BinOp { .. }
        | Expr::Subscript { .. }
        | Expr::Dict
        | Expr::List(_)
        | Expr::Tuple(_)
        | Expr::Set
        | Expr::Number(_)
        | Expr::Bool(_)
        | Expr::NoneLit
        | Expr::Other { .. } => None,
    }
}

/// Strip common indentation and surrounding blank space from a docstring
pub fn clean_docstring(raw: &str) -> String {
    let mut lines = raw.lines();
    let first = lines.next().unwrap_or("").trim();
    let rest: Vec<&str> = lines.collect();

    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    let mut cleaned = String::from(first);
    for line in rest {
        cleaned.push('\n');
        // Indentation is counted in chars; leading whitespace may be multi-byte
        let start = line
            .char_indices()
            .nth(indent)
            .map_or(line.len(), |(offset, _)| offset);
        cleaned.push_str(line[start..].trim_end());
    }
    cleaned.trim().to_string()
}

/// Literal shape of a returned expression
fn literal_tag(expr: &Expr) -> Option<&'static str> {
    match expr {
        Expr::Dict => Some("object"),
        Expr::List(_) => Some("array"),
        Expr::Str(_) | Expr::FString(_) => Some("string"),
        Expr::Number(_) => Some("number"),
        Expr::Bool(_) => Some("boolean"),
        Expr::Name(_)
        | Expr::Attribute { .. }
        | Expr::Call { .. }
        | Expr::BinOp { .. }
        | Expr::Subscript { .. }
        | Expr::Tuple(_)
        | Expr::Set
        | Expr::NoneLit
        | Expr::Other { .. } => None,
    }
}

/// First return statement with a literal shape, searching nested blocks but
/// not nested function or class bodies
fn first_literal_return(body: &[Stmt]) -> Option<&'static str> {
    body.iter().find_map(|stmt| match stmt {
        Stmt::Return {
            value: Some(value), ..
        } => literal_tag(value),
        Stmt::Block(inner) => first_literal_return(inner),
        Stmt::Return { value: None, .. }
        | Stmt::Import(_)
        | Stmt::ImportFrom { .. }
        | Stmt::ClassDef(_)
        | Stmt::FunctionDef(_)
        | Stmt::Assign { .. }
        | Stmt::Expr(_)
        | Stmt::Other { .. } => None,
    })
}

/// Extracts endpoints from modules against a completed [`ModelRegistry`]
pub struct RouteExtractor<'r> {
    registry: &'r ModelRegistry,
}

impl<'r> RouteExtractor<'r> {
    pub fn new(registry: &'r ModelRegistry) -> Self {
        Self { registry }
    }

    /// Extract every endpoint declared at the top level of `module`
    pub fn extract(&self, module: &Module) -> Extraction {
        let aliases = module_aliases(module);
        let mut extraction = Extraction::default();

        for stmt in &module.body {
            let Stmt::FunctionDef(func) = stmt else {
                continue;
            };
            if let Some(endpoint) =
                self.extract_function(module, func, &aliases, &mut extraction.diagnostics)
            {
                trace!("Extracted endpoint: {}", Pretty(&endpoint));
                extraction.endpoints.push(endpoint);
            }
        }

        debug!(
            "Extracted {} endpoints from {}",
            extraction.endpoints.len(),
            module.path.display()
        );
        extraction
    }

    fn extract_function(
        &self,
        module: &Module,
        func: &FunctionDef,
        aliases: &AliasMap,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Endpoint> {
        let route = RouteAnnotation::find(func)?;
        let location = SourceLocation {
            path: module.path.clone(),
            line: func.line,
        };

        let Some(path) = route.path_argument().and_then(resolve_path) else {
            debug!(
                "{}: unresolvable path for {} {}, skipping",
                location, route.method, func.name
            );
            return None;
        };

        let mut record = |err: ScanError| {
            warn!("{}: {}", location, err);
            diagnostics.push(Diagnostic::from_error(location.to_string(), &err));
        };

        let mut parameters: Vec<Parameter> = Vec::new();
        for param in &func.params {
            match self.extract_parameter(func, param, aliases) {
                Ok(Some(parameter)) if parameters.iter().any(|p| p.name == parameter.name) => {
                    debug!("{}: duplicate parameter {} ignored", location, parameter.name);
                }
                Ok(Some(parameter)) => parameters.push(parameter),
                Ok(None) => {}
                Err(err) => record(err),
            }
        }

        let request_body = route
            .method
            .carries_body()
            .then(|| self.request_body(&parameters))
            .flatten();

        let response_type = match self.response_type(func, aliases) {
            Ok(response_type) => response_type,
            Err(err) => {
                record(err);
                None
            }
        };

        Some(Endpoint {
            path,
            method: route.method,
            function_name: func.name.clone(),
            description: self.description(func, &route),
            parameters,
            request_body,
            response_type,
            tags: Self::tags(&route),
            source_location: location.clone(),
        })
    }

    fn description(&self, func: &FunctionDef, route: &RouteAnnotation<'_>) -> String {
        if let Some(doc) = func.docstring() {
            let cleaned = clean_docstring(doc);
            if !cleaned.is_empty() {
                return cleaned;
            }
        }
        ["summary", "description"]
            .iter()
            .find_map(|key| match route.keyword(key) {
                Some(Expr::Str(text)) if !text.trim().is_empty() => Some(clean_docstring(text)),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn tags(route: &RouteAnnotation<'_>) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        if let Some(Expr::List(items) | Expr::Tuple(items)) = route.keyword("tags") {
            for item in items {
                if let Expr::Str(tag) = item {
                    if !tags.contains(tag) {
                        tags.push(tag.clone());
                    }
                }
            }
        }
        tags
    }

    fn extract_parameter(
        &self,
        func: &FunctionDef,
        param: &Param,
        aliases: &AliasMap,
    ) -> Result<Option<Parameter>> {
        match &param.kind {
            ParamKind::Regular => {}
            ParamKind::VarPositional | ParamKind::VarKeyword => return Ok(None),
            ParamKind::Unsupported { node_kind } => {
                return Err(ScanError::extraction_failure(
                    format!("parameter {} of {}", param.name, func.name),
                    format!("unsupported parameter form `{node_kind}`"),
                ));
            }
        }
        if param.name == "self" || param.name == "cls" {
            return Ok(None);
        }

        let type_tag = match &param.annotation {
            None => "string".to_string(),
            Some(annotation) => resolved_type_tag(annotation, aliases).ok_or_else(|| {
                ScanError::extraction_failure(
                    format!("parameter {} of {}", param.name, func.name),
                    format!("unsupported annotation `{}`", annotation.describe()),
                )
            })?,
        };

        // An object-like type wins over a sentinel name
        let location = if self.registry.is_object_like(&type_tag) {
            ParamLocation::Body
        } else {
            ParamLocation::from_sentinel(&param.name).unwrap_or(ParamLocation::Path)
        };

        Ok(Some(Parameter {
            description: format!("{location} parameter: {}", param.name),
            name: param.name.clone(),
            type_tag,
            required: param.default.is_none(),
            location,
        }))
    }

    /// Shape of the first object-like parameter, or a generic placeholder
    /// when its type is not a registered model
    fn request_body(&self, parameters: &[Parameter]) -> Option<Shape> {
        let carrier = parameters
            .iter()
            .find(|p| self.registry.is_object_like(&p.type_tag))?;
        Some(
            self.registry
                .shape(&carrier.type_tag)
                .cloned()
                .unwrap_or_else(Shape::generic),
        )
    }

    fn response_type(&self, func: &FunctionDef, aliases: &AliasMap) -> Result<Option<String>> {
        match &func.returns {
            // `-> None` says nothing about the response body
            Some(Expr::NoneLit) | None => {}
            Some(annotation) => {
                return resolved_type_tag(annotation, aliases)
                    .map(Some)
                    .ok_or_else(|| {
                        ScanError::extraction_failure(
                            format!("return type of {}", func.name),
                            format!("unsupported annotation `{}`", annotation.describe()),
                        )
                    });
            }
        }
        Ok(first_literal_return(&func.body).map(str::to_string))
    }
}
