//! Owned syntax model of a Python module
//!
//! The tree-sitter CST is lowered into these sum types once per file, so the
//! registry and the route extractor work on plain data with exhaustive
//! matches instead of string-keyed node kinds. Only the constructs the two
//! passes look at are modeled; everything else lowers to an `Other` variant
//! that keeps its node kind for diagnostics.

use std::path::PathBuf;

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub path: PathBuf,
    pub body: Vec<Stmt>,
}

/// `import a.b as c` binds `c` to `a.b`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportAlias {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub bases: Vec<Expr>,
    pub decorators: Vec<Expr>,
    pub body: Vec<Stmt>,
    /// 1-based
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub is_async: bool,
    pub decorators: Vec<Expr>,
    pub params: Vec<Param>,
    pub returns: Option<Expr>,
    pub body: Vec<Stmt>,
    /// 1-based
    pub line: usize,
}

impl FunctionDef {
    /// Leading string literal of the body
    pub fn docstring(&self) -> Option<&str> {
        match self.body.first() {
            Some(Stmt::Expr(Expr::Str(doc))) => Some(doc.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamKind {
    Regular,
    /// `*args`
    VarPositional,
    /// `**kwargs`
    VarKeyword,
    /// A parameter form the lowering does not understand
    Unsupported { node_kind: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub annotation: Option<Expr>,
    pub default: Option<Expr>,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Import(Vec<ImportAlias>),
    ImportFrom {
        /// Dotted module path, with leading dots for relative imports
        module: String,
        /// Empty for `from x import *`
        names: Vec<ImportAlias>,
    },
    ClassDef(ClassDef),
    FunctionDef(FunctionDef),
    /// `target: annotation [= value]`, or a plain assignment when the
    /// annotation is absent
    Assign {
        target: Expr,
        annotation: Option<Expr>,
        value: Option<Expr>,
        line: usize,
    },
    Return {
        value: Option<Expr>,
        line: usize,
    },
    Expr(Expr),
    /// Statements nested in a compound statement (`if`, `for`, `try`, ...)
    Block(Vec<Stmt>),
    Other {
        kind: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    BitOr,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FStringPart {
    Literal(String),
    Interpolation(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(String),
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    Str(String),
    FString(Vec<FStringPart>),
    BinOp {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Subscript {
        value: Box<Expr>,
        index: Box<Expr>,
    },
    Dict,
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Set,
    Number(String),
    Bool(bool),
    NoneLit,
    Other {
        kind: String,
        text: String,
    },
}

impl Expr {
    /// `a.b.c` for name and attribute chains
    pub fn dotted_name(&self) -> Option<String> {
        match self {
            Expr::Name(name) => Some(name.clone()),
            Expr::Attribute { value, attr } => {
                value.dotted_name().map(|base| format!("{base}.{attr}"))
            }
            _ => None,
        }
    }

    /// Last component of a name or attribute chain
    pub fn last_name(&self) -> Option<&str> {
        match self {
            Expr::Name(name) => Some(name),
            Expr::Attribute { attr, .. } => Some(attr),
            _ => None,
        }
    }

    /// Keyword argument of a call by name
    pub fn keyword(&self, name: &str) -> Option<&Expr> {
        match self {
            Expr::Call { keywords, .. } => keywords
                .iter()
                .find(|k| k.name == name)
                .map(|k| &k.value),
            _ => None,
        }
    }

    /// Short human readable label for diagnostics
    pub fn describe(&self) -> String {
        match self {
            Expr::Other { kind, .. } => kind.clone(),
            Expr::Call { .. } => "call".to_string(),
            Expr::Subscript { .. } => "subscript".to_string(),
            Expr::BinOp { .. } => "binary operator".to_string(),
            Expr::Dict => "dictionary".to_string(),
            Expr::List(_) => "list".to_string(),
            Expr::Tuple(_) => "tuple".to_string(),
            Expr::Set => "set".to_string(),
            other => other
                .dotted_name()
                .unwrap_or_else(|| "literal".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(value: Expr, attr: &str) -> Expr {
        Expr::Attribute {
            value: Box::new(value),
            attr: attr.to_string(),
        }
    }

    #[test]
    fn test_dotted_name() {
        let expr = attr(attr(Expr::Name("pydantic".into()), "main"), "BaseModel");
        assert_eq!(expr.dotted_name().as_deref(), Some("pydantic.main.BaseModel"));
        assert_eq!(expr.last_name(), Some("BaseModel"));
        assert_eq!(Expr::Number("1".into()).dotted_name(), None);
    }

    #[test]
    fn test_keyword_lookup() {
        let call = Expr::Call {
            func: Box::new(Expr::Name("Field".into())),
            args: vec![],
            keywords: vec![Keyword {
                name: "description".into(),
                value: Expr::Str("User name".into()),
            }],
        };
        assert_eq!(call.keyword("description"), Some(&Expr::Str("User name".into())));
        assert_eq!(call.keyword("default"), None);
    }

    #[test]
    fn test_docstring_is_leading_string_only() {
        let mut func = FunctionDef {
            name: "f".into(),
            is_async: false,
            decorators: vec![],
            params: vec![],
            returns: None,
            body: vec![Stmt::Expr(Expr::Str("Fetch a user".into()))],
            line: 1,
        };
        assert_eq!(func.docstring(), Some("Fetch a user"));

        func.body.insert(0, Stmt::Other { kind: "pass_statement".into() });
        assert_eq!(func.docstring(), None);
    }
}
