//! Type annotation → type tag resolution
//!
//! Shared by the model registry (member types) and the route extractor
//! (parameter and return types).

use crate::syntax::{BinOp, Expr};
use std::collections::BTreeMap;

/// Bound name → dotted origin, e.g. `BM` → `pydantic.BaseModel`
pub type AliasMap = BTreeMap<String, String>;

/// Resolve a name or attribute chain through the import aliases of its module
pub fn resolve_dotted(expr: &Expr, aliases: &AliasMap) -> Option<String> {
    let dotted = expr.dotted_name()?;
    let (head, rest) = match dotted.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (dotted.as_str(), None),
    };
    let head = aliases.get(head).map(String::as_str).unwrap_or(head);
    Some(match rest {
        Some(rest) => format!("{head}.{rest}"),
        None => head.to_string(),
    })
}

/// Last component of a dotted name
pub fn last_component(dotted: &str) -> &str {
    dotted.rsplit('.').next().unwrap_or(dotted)
}

/// Resolve an annotation to a type tag
///
/// - a plain name stays as written (`str`, `CreateUserRequest`)
/// - attribute access keeps its last component (`models.User` → `User`)
/// - a string annotation is a forward reference to the named type
/// - `Optional[X]`, `Annotated[X, ...]` and `X | None` resolve to `X`
/// - sequence containers become `array`, mapping containers `object`,
///   any other generic the lowercase base name
///
/// Returns `None` for annotations that are not type expressions.
pub fn type_tag(annotation: &Expr) -> Option<String> {
    match annotation {
        Expr::Name(name) => Some(name.clone()),
        Expr::Attribute { attr, .. } => Some(attr.clone()),
        Expr::Str(forward) => {
            let forward = forward.trim();
            (!forward.is_empty()).then(|| last_component(forward).to_string())
        }
        Expr::NoneLit => Some("none".to_string()),
        Expr::Subscript { value, index } => {
            let base = value.last_name()?.to_ascii_lowercase();
            let members: Vec<&Expr> = match index.as_ref() {
                Expr::Tuple(items) => items.iter().collect(),
                single => vec![single],
            };
            match base.as_str() {
                "optional" | "annotated" | "required" | "notrequired" | "final" => {
                    members.first().and_then(|inner| type_tag(inner))
                }
                "union" => members
                    .into_iter()
                    .find(|member| !matches!(member, Expr::NoneLit))
                    .and_then(type_tag),
                "list" | "sequence" | "set" | "frozenset" | "tuple" | "iterable" => {
                    Some("array".to_string())
                }
                "dict" | "mapping" => Some("object".to_string()),
                _ => Some(base),
            }
        }
        Expr::BinOp {
            left,
            op: BinOp::BitOr,
            right,
        } => match (left.as_ref(), right.as_ref()) {
            (Expr::NoneLit, other) | (other, _) => type_tag(other),
        },
        Expr::BinOp { .. }
        | Expr::Call { .. }
        | Expr::FString(_)
        | Expr::Dict
        | Expr::List(_)
        | Expr::Tuple(_)
        | Expr::Set
        | Expr::Number(_)
        | Expr::Bool(_)
        | Expr::Other { .. } => None,
    }
}

/// [`type_tag`], with a plain name mapped through the module's import aliases
pub fn resolved_type_tag(annotation: &Expr, aliases: &AliasMap) -> Option<String> {
    let tag = type_tag(annotation)?;
    match (annotation, aliases.get(&tag)) {
        (Expr::Name(_), Some(origin)) => Some(last_component(origin).to_string()),
        _ => Some(tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn name(n: &str) -> Expr {
        Expr::Name(n.to_string())
    }

    fn subscript(base: &str, index: Expr) -> Expr {
        Expr::Subscript {
            value: Box::new(name(base)),
            index: Box::new(index),
        }
    }

    #[rstest]
    #[case(name("str"), "str")]
    #[case(Expr::Attribute { value: Box::new(name("models")), attr: "User".into() }, "User")]
    #[case(subscript("List", name("int")), "array")]
    #[case(subscript("dict", Expr::Tuple(vec![name("str"), name("int")])), "object")]
    #[case(subscript("Optional", name("int")), "int")]
    #[case(subscript("Union", Expr::Tuple(vec![Expr::NoneLit, name("float")])), "float")]
    #[case(subscript("Annotated", Expr::Tuple(vec![name("str"), name("Query")])), "str")]
    #[case(subscript("Literal", Expr::Str("a".into())), "literal")]
    #[case(Expr::Str("CreateUserRequest".into()), "CreateUserRequest")]
    fn test_type_tag(#[case] annotation: Expr, #[case] expected: &str) {
        assert_eq!(type_tag(&annotation).as_deref(), Some(expected));
    }

    #[test]
    fn test_pipe_union_skips_none() {
        let union = Expr::BinOp {
            left: Box::new(Expr::NoneLit),
            op: BinOp::BitOr,
            right: Box::new(name("bool")),
        };
        assert_eq!(type_tag(&union).as_deref(), Some("bool"));
    }

    #[test]
    fn test_non_type_expression_has_no_tag() {
        assert_eq!(type_tag(&Expr::Number("3".into())), None);
    }

    #[test]
    fn test_aliases() {
        let mut aliases = AliasMap::new();
        aliases.insert("pd".into(), "pydantic".into());
        aliases.insert("CUR".into(), "app.models.CreateUserRequest".into());

        let base = Expr::Attribute {
            value: Box::new(name("pd")),
            attr: "BaseModel".into(),
        };
        assert_eq!(
            resolve_dotted(&base, &aliases).as_deref(),
            Some("pydantic.BaseModel")
        );
        assert_eq!(
            resolved_type_tag(&name("CUR"), &aliases).as_deref(),
            Some("CreateUserRequest")
        );
        assert_eq!(last_component("a.b.c"), "c");
    }
}
