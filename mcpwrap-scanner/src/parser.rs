//! Syntax model builder
//!
//! Parses Python source with tree-sitter and lowers the concrete syntax tree
//! into the owned [`crate::syntax`] model. A file whose tree contains any
//! error node is rejected as a whole with [`ScanError::ParseFailure`].

use crate::error::{Result, ScanError};
use crate::syntax::{
    BinOp, ClassDef, Expr, FStringPart, FunctionDef, ImportAlias, Keyword, Module, Param,
    ParamKind, Stmt,
};
use std::cell::Cell;
use std::path::Path;
use tracing::trace;
use tree_sitter::{Language, Node, Parser};

/// Expression nesting past this lowers to [`Expr::Other`]
const MAX_EXPR_DEPTH: usize = 200;

fn lang_python() -> Language {
    tree_sitter_python::LANGUAGE.into()
}

/// Tree-sitter parser configured for Python
///
/// A parser is not shareable across threads, so each worker owns one.
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    /// Create a parser with the Python grammar loaded
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&lang_python())
            .map_err(|e| ScanError::parse_failure("<grammar>", e.to_string()))?;
        Ok(Self { parser })
    }

    /// Read and parse a file from disk
    pub fn parse_file(&mut self, path: &Path) -> Result<Module> {
        let source = std::fs::read_to_string(path)?;
        self.parse(path, &source)
    }

    /// Parse source text that came from `path`
    pub fn parse(&mut self, path: &Path, source: &str) -> Result<Module> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ScanError::parse_failure(path, "Parse returned None"))?;

        let root = tree.root_node();
        if root.has_error() {
            let message = match first_error(root) {
                Some(node) => format!(
                    "syntax error at line {}, column {}",
                    node.start_position().row + 1,
                    node.start_position().column + 1
                ),
                None => "syntax error".to_string(),
            };
            return Err(ScanError::parse_failure(path, message));
        }

        let lowerer = Lowerer {
            source,
            depth: Cell::new(0),
        };
        let body = lowerer.block_items(root);
        trace!("Lowered {} top-level statements from {}", body.len(), path.display());

        Ok(Module {
            path: path.to_path_buf(),
            body,
        })
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

/// Named children without comments
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn first_named_child(node: Node<'_>) -> Option<Node<'_>> {
    named_children(node).into_iter().next()
}

fn line_of(node: Node<'_>) -> usize {
    node.start_position().row + 1
}

/// Merge adjacent literal parts
fn push_part(parts: &mut Vec<FStringPart>, part: FStringPart) {
    match (parts.last_mut(), part) {
        (Some(FStringPart::Literal(prev)), FStringPart::Literal(next)) => prev.push_str(&next),
        (_, part) => parts.push(part),
    }
}

struct Lowerer<'s> {
    source: &'s str,
    depth: Cell<usize>,
}

impl Lowerer<'_> {
    fn text(&self, node: Node<'_>) -> String {
        node.utf8_text(self.source.as_bytes())
            .unwrap_or_default()
            .to_string()
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<String> {
        node.child_by_field_name(field).map(|n| self.text(n))
    }

    fn block_items(&self, node: Node<'_>) -> Vec<Stmt> {
        named_children(node)
            .into_iter()
            .map(|child| self.statement(child))
            .collect()
    }

    fn statement(&self, node: Node<'_>) -> Stmt {
        match node.kind() {
            "import_statement" => Stmt::Import(self.import_names(node)),
            "import_from_statement" => Stmt::ImportFrom {
                module: self.field_text(node, "module_name").unwrap_or_default(),
                names: self.import_names(node),
            },
            "class_definition" => Stmt::ClassDef(self.class_def(node, Vec::new())),
            "function_definition" => Stmt::FunctionDef(self.function_def(node, Vec::new())),
            "decorated_definition" => self.decorated(node),
            "expression_statement" => self.expression_statement(node),
            "return_statement" => Stmt::Return {
                value: first_named_child(node).map(|value| self.expr(value)),
                line: line_of(node),
            },
            "block" => Stmt::Block(self.block_items(node)),
            "if_statement" | "for_statement" | "while_statement" | "try_statement"
            | "with_statement" | "match_statement" | "case_clause" => {
                Stmt::Block(self.nested_statements(node))
            }
            kind => Stmt::Other {
                kind: kind.to_string(),
            },
        }
    }

    /// Statements in the blocks and clauses of a compound statement
    fn nested_statements(&self, node: Node<'_>) -> Vec<Stmt> {
        let mut statements = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "block" => statements.extend(self.block_items(child)),
                kind if kind.ends_with("_clause") => {
                    statements.extend(self.nested_statements(child))
                }
                _ => {}
            }
        }
        statements
    }

    fn import_names(&self, node: Node<'_>) -> Vec<ImportAlias> {
        let mut cursor = node.walk();
        let names: Vec<_> = node.children_by_field_name("name", &mut cursor).collect();
        names
            .into_iter()
            .map(|name| match name.kind() {
                "aliased_import" => ImportAlias {
                    name: self.field_text(name, "name").unwrap_or_default(),
                    alias: self.field_text(name, "alias"),
                },
                _ => ImportAlias {
                    name: self.text(name),
                    alias: None,
                },
            })
            .collect()
    }

    fn decorated(&self, node: Node<'_>) -> Stmt {
        let decorators: Vec<Expr> = named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "decorator")
            .filter_map(first_named_child)
            .map(|expr| self.expr(expr))
            .collect();

        match node.child_by_field_name("definition") {
            Some(def) if def.kind() == "function_definition" => {
                Stmt::FunctionDef(self.function_def(def, decorators))
            }
            Some(def) if def.kind() == "class_definition" => {
                Stmt::ClassDef(self.class_def(def, decorators))
            }
            _ => Stmt::Other {
                kind: node.kind().to_string(),
            },
        }
    }

    fn class_def(&self, node: Node<'_>, decorators: Vec<Expr>) -> ClassDef {
        let bases = node
            .child_by_field_name("superclasses")
            .map(|list| {
                named_children(list)
                    .into_iter()
                    .filter(|arg| arg.kind() != "keyword_argument")
                    .map(|arg| self.expr(arg))
                    .collect()
            })
            .unwrap_or_default();

        ClassDef {
            name: self.field_text(node, "name").unwrap_or_default(),
            bases,
            decorators,
            body: node
                .child_by_field_name("body")
                .map(|body| self.block_items(body))
                .unwrap_or_default(),
            line: line_of(node),
        }
    }

    fn function_def(&self, node: Node<'_>, decorators: Vec<Expr>) -> FunctionDef {
        let mut cursor = node.walk();
        let is_async = node.children(&mut cursor).any(|child| child.kind() == "async");

        FunctionDef {
            name: self.field_text(node, "name").unwrap_or_default(),
            is_async,
            decorators,
            params: node
                .child_by_field_name("parameters")
                .map(|params| self.params(params))
                .unwrap_or_default(),
            returns: node
                .child_by_field_name("return_type")
                .map(|ret| self.type_expr(ret)),
            body: node
                .child_by_field_name("body")
                .map(|body| self.block_items(body))
                .unwrap_or_default(),
            line: line_of(node),
        }
    }

    fn params(&self, node: Node<'_>) -> Vec<Param> {
        let mut params = Vec::new();
        for child in named_children(node) {
            let param = match child.kind() {
                "identifier" => Param {
                    name: self.text(child),
                    annotation: None,
                    default: None,
                    kind: ParamKind::Regular,
                },
                "typed_parameter" => {
                    let Some(inner) = first_named_child(child) else {
                        continue;
                    };
                    let (name, kind) = self.param_target(inner);
                    Param {
                        name,
                        annotation: child
                            .child_by_field_name("type")
                            .map(|ty| self.type_expr(ty)),
                        default: None,
                        kind,
                    }
                }
                "default_parameter" | "typed_default_parameter" => Param {
                    name: self.field_text(child, "name").unwrap_or_default(),
                    annotation: child
                        .child_by_field_name("type")
                        .map(|ty| self.type_expr(ty)),
                    default: child.child_by_field_name("value").map(|v| self.expr(v)),
                    kind: ParamKind::Regular,
                },
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    let (name, kind) = self.param_target(child);
                    Param {
                        name,
                        annotation: None,
                        default: None,
                        kind,
                    }
                }
                "keyword_separator" | "positional_separator" => continue,
                kind => Param {
                    name: self.text(child),
                    annotation: None,
                    default: None,
                    kind: ParamKind::Unsupported {
                        node_kind: kind.to_string(),
                    },
                },
            };
            params.push(param);
        }
        params
    }

    fn param_target(&self, node: Node<'_>) -> (String, ParamKind) {
        let splat_name = || {
            first_named_child(node)
                .map(|n| self.text(n))
                .unwrap_or_default()
        };
        match node.kind() {
            "identifier" => (self.text(node), ParamKind::Regular),
            "list_splat_pattern" => (splat_name(), ParamKind::VarPositional),
            "dictionary_splat_pattern" => (splat_name(), ParamKind::VarKeyword),
            kind => (
                self.text(node),
                ParamKind::Unsupported {
                    node_kind: kind.to_string(),
                },
            ),
        }
    }

    fn expression_statement(&self, node: Node<'_>) -> Stmt {
        let children = named_children(node);
        match children.as_slice() {
            [single] if single.kind() == "assignment" => Stmt::Assign {
                target: single
                    .child_by_field_name("left")
                    .map(|left| self.expr(left))
                    .unwrap_or(Expr::NoneLit),
                annotation: single
                    .child_by_field_name("type")
                    .map(|ty| self.type_expr(ty)),
                value: single.child_by_field_name("right").map(|right| self.expr(right)),
                line: line_of(*single),
            },
            [single] => Stmt::Expr(self.expr(*single)),
            many => Stmt::Expr(Expr::Tuple(many.iter().map(|n| self.expr(*n)).collect())),
        }
    }

    /// Run `lower` one nesting level down, or keep `node` opaque once the
    /// expression is too deep
    fn nested(&self, node: Node<'_>, lower: impl FnOnce() -> Expr) -> Expr {
        let depth = self.depth.get();
        if depth >= MAX_EXPR_DEPTH {
            trace!(
                "Expression at line {} nested past {} levels",
                line_of(node),
                MAX_EXPR_DEPTH
            );
            return self.other(node);
        }
        self.depth.set(depth + 1);
        let expr = lower();
        self.depth.set(depth);
        expr
    }

    /// Lower an annotation; `type` wrappers and the type-only node kinds
    /// fold into ordinary expressions
    fn type_expr(&self, node: Node<'_>) -> Expr {
        self.nested(node, || self.lower_type(node))
    }

    fn lower_type(&self, node: Node<'_>) -> Expr {
        match node.kind() {
            "type" => match first_named_child(node) {
                Some(inner) => self.type_expr(inner),
                None => self.other(node),
            },
            "generic_type" => {
                let children = named_children(node);
                let base = children
                    .iter()
                    .find(|child| child.kind() != "type_parameter")
                    .map(|child| self.type_expr(*child));
                let params: Vec<Expr> = children
                    .iter()
                    .filter(|child| child.kind() == "type_parameter")
                    .flat_map(|tp| named_children(*tp))
                    .map(|ty| self.type_expr(ty))
                    .collect();
                match base {
                    Some(base) => Expr::Subscript {
                        value: Box::new(base),
                        index: Box::new(Self::single_or_tuple(params)),
                    },
                    None => self.other(node),
                }
            }
            "union_type" => {
                let mut members = named_children(node)
                    .into_iter()
                    .map(|child| self.type_expr(child));
                match (members.next(), members.next()) {
                    (Some(left), Some(right)) => Expr::BinOp {
                        left: Box::new(left),
                        op: BinOp::BitOr,
                        right: Box::new(right),
                    },
                    _ => self.other(node),
                }
            }
            "member_type" => {
                let children = named_children(node);
                match children.as_slice() {
                    [value, attr] => Expr::Attribute {
                        value: Box::new(self.type_expr(*value)),
                        attr: self.text(*attr),
                    },
                    _ => self.other(node),
                }
            }
            _ => self.expr(node),
        }
    }

    fn single_or_tuple(mut items: Vec<Expr>) -> Expr {
        if items.len() == 1 {
            items.remove(0)
        } else {
            Expr::Tuple(items)
        }
    }

    fn other(&self, node: Node<'_>) -> Expr {
        Expr::Other {
            kind: node.kind().to_string(),
            text: self.text(node),
        }
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        self.nested(node, || self.lower_expr(node))
    }

    fn lower_expr(&self, node: Node<'_>) -> Expr {
        match node.kind() {
            "identifier" => Expr::Name(self.text(node)),
            "attribute" => match (
                node.child_by_field_name("object"),
                self.field_text(node, "attribute"),
            ) {
                (Some(object), Some(attr)) => Expr::Attribute {
                    value: Box::new(self.expr(object)),
                    attr,
                },
                _ => self.other(node),
            },
            "call" => self.call(node),
            "string" => self.string(node),
            "concatenated_string" => self.concatenated_string(node),
            "binary_operator" => {
                let op = match self.field_text(node, "operator").as_deref() {
                    Some("+") => BinOp::Add,
                    Some("|") => BinOp::BitOr,
                    _ => BinOp::Other,
                };
                match (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) {
                    (Some(left), Some(right)) => Expr::BinOp {
                        left: Box::new(self.expr(left)),
                        op,
                        right: Box::new(self.expr(right)),
                    },
                    _ => self.other(node),
                }
            }
            "subscript" => {
                let mut cursor = node.walk();
                let indices: Vec<_> = node
                    .children_by_field_name("subscript", &mut cursor)
                    .collect();
                let indices: Vec<Expr> = indices.into_iter().map(|i| self.type_expr(i)).collect();
                match node.child_by_field_name("value") {
                    Some(value) => Expr::Subscript {
                        value: Box::new(self.expr(value)),
                        index: Box::new(Self::single_or_tuple(indices)),
                    },
                    None => self.other(node),
                }
            }
            "dictionary" | "dictionary_comprehension" => Expr::Dict,
            "list" => Expr::List(self.elements(node)),
            "list_comprehension" => Expr::List(Vec::new()),
            "tuple" | "expression_list" => Expr::Tuple(self.elements(node)),
            "set" | "set_comprehension" => Expr::Set,
            "integer" | "float" => Expr::Number(self.text(node)),
            "true" => Expr::Bool(true),
            "false" => Expr::Bool(false),
            "none" => Expr::NoneLit,
            "unary_operator" => match node.child_by_field_name("argument") {
                Some(arg) if matches!(arg.kind(), "integer" | "float") => {
                    Expr::Number(self.text(node))
                }
                _ => self.other(node),
            },
            "parenthesized_expression" => match first_named_child(node) {
                Some(inner) => self.expr(inner),
                None => self.other(node),
            },
            "type" | "generic_type" | "union_type" | "member_type" => self.type_expr(node),
            _ => self.other(node),
        }
    }

    fn elements(&self, node: Node<'_>) -> Vec<Expr> {
        named_children(node)
            .into_iter()
            .map(|child| self.expr(child))
            .collect()
    }

    fn call(&self, node: Node<'_>) -> Expr {
        let Some(func) = node.child_by_field_name("function") else {
            return self.other(node);
        };

        let mut args = Vec::new();
        let mut keywords = Vec::new();
        if let Some(arguments) = node.child_by_field_name("arguments") {
            if arguments.kind() == "argument_list" {
                for arg in named_children(arguments) {
                    if arg.kind() == "keyword_argument" {
                        if let (Some(name), Some(value)) =
                            (self.field_text(arg, "name"), arg.child_by_field_name("value"))
                        {
                            keywords.push(Keyword {
                                name,
                                value: self.expr(value),
                            });
                        }
                    } else {
                        args.push(self.expr(arg));
                    }
                }
            } else {
                args.push(self.other(arguments));
            }
        }

        Expr::Call {
            func: Box::new(self.expr(func)),
            args,
            keywords,
        }
    }

    /// Literal and interpolation parts of one string node, plus whether it
    /// is an f-string
    fn string_parts(&self, node: Node<'_>) -> (bool, Vec<FStringPart>) {
        let mut is_fstring = false;
        let mut parts = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "string_start" => {
                    is_fstring = self
                        .text(child)
                        .chars()
                        .take_while(|c| *c != '"' && *c != '\'')
                        .any(|c| c == 'f' || c == 'F');
                }
                "string_content" | "escape_sequence" | "escape_interpolation" => {
                    push_part(&mut parts, FStringPart::Literal(self.text(child)));
                }
                "interpolation" => {
                    let expr = node_expression(child)
                        .map(|inner| self.expr(inner))
                        .unwrap_or_else(|| self.other(child));
                    parts.push(FStringPart::Interpolation(expr));
                }
                _ => {}
            }
        }

        if is_fstring {
            for part in parts.iter_mut() {
                if let FStringPart::Literal(text) = part {
                    *text = text.replace("{{", "{").replace("}}", "}");
                }
            }
        }
        (is_fstring, parts)
    }

    fn string(&self, node: Node<'_>) -> Expr {
        let (is_fstring, parts) = self.string_parts(node);
        Self::finish_string(is_fstring, parts)
    }

    fn concatenated_string(&self, node: Node<'_>) -> Expr {
        let mut any_fstring = false;
        let mut parts = Vec::new();
        for child in named_children(node) {
            if child.kind() != "string" {
                continue;
            }
            let (is_fstring, child_parts) = self.string_parts(child);
            any_fstring |= is_fstring;
            for part in child_parts {
                push_part(&mut parts, part);
            }
        }
        Self::finish_string(any_fstring, parts)
    }

    fn finish_string(is_fstring: bool, parts: Vec<FStringPart>) -> Expr {
        if is_fstring {
            return Expr::FString(parts);
        }
        let text = parts
            .into_iter()
            .filter_map(|part| match part {
                FStringPart::Literal(text) => Some(text),
                FStringPart::Interpolation(_) => None,
            })
            .collect();
        Expr::Str(text)
    }
}

fn node_expression(interpolation: Node<'_>) -> Option<Node<'_>> {
    interpolation
        .child_by_field_name("expression")
        .or_else(|| first_named_child(interpolation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(source: &str) -> Module {
        SourceParser::new()
            .unwrap()
            .parse(&PathBuf::from("test.py"), source)
            .unwrap()
    }

    fn only_function(module: &Module) -> &FunctionDef {
        module
            .body
            .iter()
            .find_map(|stmt| match stmt {
                Stmt::FunctionDef(f) => Some(f),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn test_syntax_error_is_parse_failure() {
        let err = SourceParser::new()
            .unwrap()
            .parse(&PathBuf::from("bad.py"), "def broken(:\n    pass\n")
            .unwrap_err();
        assert!(matches!(err, ScanError::ParseFailure { .. }));
        assert!(err.to_string().contains("bad.py"));
    }

    #[test]
    fn test_imports() {
        let module = parse(
            "import os, pydantic as pd\nfrom fastapi import FastAPI, Query as Q\nfrom .models import *\n",
        );
        assert_eq!(
            module.body[0],
            Stmt::Import(vec![
                ImportAlias {
                    name: "os".into(),
                    alias: None
                },
                ImportAlias {
                    name: "pydantic".into(),
                    alias: Some("pd".into())
                },
            ])
        );
        match &module.body[1] {
            Stmt::ImportFrom { module, names } => {
                assert_eq!(module, "fastapi");
                assert_eq!(names.len(), 2);
                assert_eq!(names[1].alias.as_deref(), Some("Q"));
            }
            other => panic!("unexpected {other:?}"),
        }
        match &module.body[2] {
            Stmt::ImportFrom { module, names } => {
                assert_eq!(module, ".models");
                assert!(names.is_empty());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decorated_async_function() {
        let module = parse(
            r#"
@app.get("/users/{user_id}", tags=["users"])
async def read_user(user_id: int, q: str = None, *args, **kwargs) -> dict:
    """Fetch one user."""
    return {"id": user_id}
"#,
        );
        let func = only_function(&module);
        assert_eq!(func.name, "read_user");
        assert!(func.is_async);
        assert_eq!(func.line, 3);
        assert_eq!(func.docstring(), Some("Fetch one user."));
        assert_eq!(func.returns, Some(Expr::Name("dict".into())));

        match &func.decorators[0] {
            Expr::Call {
                func: callee,
                args,
                keywords,
            } => {
                assert_eq!(callee.dotted_name().as_deref(), Some("app.get"));
                assert_eq!(args[0], Expr::Str("/users/{user_id}".into()));
                assert_eq!(keywords[0].name, "tags");
            }
            other => panic!("unexpected {other:?}"),
        }

        let names: Vec<_> = func.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["user_id", "q", "args", "kwargs"]);
        assert_eq!(func.params[0].annotation, Some(Expr::Name("int".into())));
        assert_eq!(func.params[1].default, Some(Expr::NoneLit));
        assert_eq!(func.params[2].kind, ParamKind::VarPositional);
        assert_eq!(func.params[3].kind, ParamKind::VarKeyword);
    }

    #[test]
    fn test_fstring_parts() {
        let module = parse("x = f\"{API_PREFIX}/items/{{raw}}\"\n");
        match &module.body[0] {
            Stmt::Assign {
                value: Some(Expr::FString(parts)),
                ..
            } => {
                assert_eq!(
                    parts,
                    &vec![
                        FStringPart::Interpolation(Expr::Name("API_PREFIX".into())),
                        FStringPart::Literal("/items/{raw}".into()),
                    ]
                );
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_class_members_and_bases() {
        let module = parse(
            r#"
class CreateUserRequest(pydantic.BaseModel, metaclass=Meta):
    # comment between members
    name: str
    age: Optional[int] = None
"#,
        );
        match &module.body[0] {
            Stmt::ClassDef(class) => {
                assert_eq!(class.name, "CreateUserRequest");
                assert_eq!(class.bases.len(), 1);
                assert_eq!(class.bases[0].last_name(), Some("BaseModel"));
                assert_eq!(class.body.len(), 2);
                match &class.body[1] {
                    Stmt::Assign {
                        target,
                        annotation: Some(Expr::Subscript { value, index }),
                        value: Some(Expr::NoneLit),
                        ..
                    } => {
                        assert_eq!(target, &Expr::Name("age".into()));
                        assert_eq!(value.last_name(), Some("Optional"));
                        assert_eq!(index.as_ref(), &Expr::Name("int".into()));
                    }
                    other => panic!("unexpected {other:?}"),
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_returns_inside_compound_statements() {
        let module = parse(
            r#"
def f(flag):
    if flag:
        return [1, 2]
    else:
        return "no"
"#,
        );
        let func = only_function(&module);
        match &func.body[0] {
            Stmt::Block(stmts) => {
                assert!(matches!(stmts[0], Stmt::Return { value: Some(Expr::List(_)), .. }));
                assert!(matches!(stmts[1], Stmt::Return { value: Some(Expr::Str(_)), .. }));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_string_concatenation_operator() {
        let module = parse("p = PREFIX + \"/health\"\n");
        match &module.body[0] {
            Stmt::Assign {
                value: Some(Expr::BinOp { left, op, right }),
                ..
            } => {
                assert_eq!(*op, BinOp::Add);
                assert_eq!(left.as_ref(), &Expr::Name("PREFIX".into()));
                assert_eq!(right.as_ref(), &Expr::Str("/health".into()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_deep_expression_becomes_opaque() {
        let terms = vec!["\"a\""; 5000].join(" + ");
        let source = format!("X = {terms}\n\n@app.get(\"/health\")\ndef health():\n    pass\n");
        let module = parse(&source);

        let Stmt::Assign {
            value: Some(value), ..
        } = &module.body[0]
        else {
            panic!("expected an assignment");
        };
        let mut expr = value;
        let mut depth = 0;
        while let Expr::BinOp { left, .. } = expr {
            expr = left.as_ref();
            depth += 1;
        }
        assert!(depth < MAX_EXPR_DEPTH);
        assert!(matches!(expr, Expr::Other { kind, .. } if kind == "binary_operator"));

        assert_eq!(only_function(&module).name, "health");
    }
}
