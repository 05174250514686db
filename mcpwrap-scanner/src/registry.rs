//! Type & model registry (pass 1)
//!
//! Records import aliases and the locally defined structured-record types
//! (pydantic models, typed dicts, dataclasses) of every parsed module. The
//! registry is rebuilt on every scan and only read once route extraction
//! starts.

use crate::annotation::{last_component, resolve_dotted, type_tag, AliasMap};
use crate::endpoint::{is_object_tag, Property, SchemaType, Shape};
use crate::error::ScanError;
use crate::syntax::{ClassDef, Expr, Module, Stmt};
use mcpwrap_common::{Diagnostic, Pretty};
use mcpwrap_config::ScanSettings;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace, warn};

/// Names that mark a class as a structured record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelMarkers {
    bases: BTreeSet<String>,
    decorators: BTreeSet<String>,
}

impl ModelMarkers {
    pub fn new<B, D>(bases: B, decorators: D) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        Self {
            bases: bases.into_iter().map(Into::into).collect(),
            decorators: decorators.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_settings(settings: &ScanSettings) -> Self {
        Self::new(
            settings.model_bases.iter().cloned(),
            settings.model_decorators.iter().cloned(),
        )
    }

    /// Treat subclasses of `name` as records too
    pub fn add_base(&mut self, name: impl Into<String>) {
        self.bases.insert(name.into());
    }
}

/// Import aliases bound at the top level of a module
pub fn module_aliases(module: &Module) -> AliasMap {
    let mut aliases = AliasMap::new();
    for stmt in &module.body {
        match stmt {
            Stmt::Import(names) => {
                for import in names {
                    match &import.alias {
                        Some(alias) => {
                            aliases.insert(alias.clone(), import.name.clone());
                        }
                        None => {
                            // `import a.b` binds `a`
                            let head = import.name.split('.').next().unwrap_or(&import.name);
                            aliases.insert(head.to_string(), head.to_string());
                        }
                    }
                }
            }
            Stmt::ImportFrom { module, names } => {
                for import in names {
                    let bound = import.alias.as_ref().unwrap_or(&import.name);
                    aliases.insert(bound.clone(), format!("{module}.{}", import.name));
                }
            }
            Stmt::ClassDef(_)
            | Stmt::FunctionDef(_)
            | Stmt::Assign { .. }
            | Stmt::Return { .. }
            | Stmt::Expr(_)
            | Stmt::Block(_)
            | Stmt::Other { .. } => {}
        }
    }
    aliases
}

/// Whether a class definition is a structured record
///
/// A class qualifies when one of its bases, after alias resolution, ends in
/// a marker base name (`BaseModel`, `pydantic.BaseModel`, `pd.BaseModel`), or
/// when it carries a marker decorator (`@dataclass`, `@dataclasses.dataclass(frozen=True)`).
pub fn is_structured_record(class: &ClassDef, aliases: &AliasMap, markers: &ModelMarkers) -> bool {
    let marked_by = |expr: &Expr, names: &BTreeSet<String>| {
        resolve_dotted(expr, aliases)
            .map(|dotted| names.contains(last_component(&dotted)))
            .unwrap_or(false)
    };

    let by_base = class.bases.iter().any(|base| {
        let base = match base {
            Expr::Subscript { value, .. } => value.as_ref(),
            other => other,
        };
        marked_by(base, &markers.bases)
    });

    by_base
        || class.decorators.iter().any(|decorator| {
            let target = match decorator {
                Expr::Call { func, .. } => func.as_ref(),
                other => other,
            };
            marked_by(target, &markers.decorators)
        })
}

struct ModuleClasses<'m> {
    module: &'m Module,
    aliases: AliasMap,
    classes: Vec<&'m ClassDef>,
}

/// Name → shape table of structured records, plus the merged import aliases
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, Shape>,
    aliases: AliasMap,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry from every parsed module
    ///
    /// Modules are expected in a stable order; when two modules define a
    /// model with the same name the first one wins. Subclasses of registered
    /// models qualify as well and inherit their fields.
    pub fn build(modules: &[Module], settings: &ScanSettings) -> (Self, Vec<Diagnostic>) {
        let collected: Vec<ModuleClasses<'_>> = modules
            .par_iter()
            .map(|module| ModuleClasses {
                module,
                aliases: module_aliases(module),
                classes: module
                    .body
                    .iter()
                    .filter_map(|stmt| match stmt {
                        Stmt::ClassDef(class) => Some(class),
                        _ => None,
                    })
                    .collect(),
            })
            .collect();

        let mut registry = Self::new();
        let mut diagnostics = Vec::new();

        for entry in &collected {
            for (alias, origin) in &entry.aliases {
                registry
                    .aliases
                    .entry(alias.clone())
                    .or_insert_with(|| origin.clone());
            }
        }

        let mut markers = ModelMarkers::from_settings(settings);
        let mut pending: Vec<(usize, &ClassDef)> = collected
            .iter()
            .enumerate()
            .flat_map(|(idx, entry)| entry.classes.iter().map(move |class| (idx, *class)))
            .collect();

        // Repeat until no class qualifies, so subclasses of models declared
        // later or in other files are picked up
        loop {
            let mut qualified = Vec::new();
            pending.retain(|(idx, class)| {
                if is_structured_record(class, &collected[*idx].aliases, &markers) {
                    qualified.push((*idx, *class));
                    false
                } else {
                    true
                }
            });
            if qualified.is_empty() {
                break;
            }

            for (idx, class) in qualified {
                let entry = &collected[idx];
                let (shape, class_diagnostics) = registry.shape_for(class, entry);
                diagnostics.extend(class_diagnostics);
                markers.add_base(class.name.clone());

                if registry.models.contains_key(&class.name) {
                    debug!(
                        "Model {} in {} shadowed by an earlier definition",
                        class.name,
                        entry.module.path.display()
                    );
                    continue;
                }
                trace!("Registered model {}: {}", class.name, Pretty(&shape));
                registry.models.insert(class.name.clone(), shape);
            }
        }

        debug!("Registered {} models", registry.models.len());
        (registry, diagnostics)
    }

    fn shape_for(&self, class: &ClassDef, entry: &ModuleClasses<'_>) -> (Shape, Vec<Diagnostic>) {
        let mut shape = Shape::named(class.name.clone());
        let mut diagnostics = Vec::new();

        for base in &class.bases {
            let Some(parent) = resolve_dotted(base, &entry.aliases)
                .and_then(|dotted| self.models.get(last_component(&dotted)))
            else {
                continue;
            };
            for (name, property) in &parent.properties {
                shape.insert(name.clone(), property.clone(), parent.required.contains(name));
            }
        }

        for stmt in &class.body {
            let Stmt::Assign {
                target: Expr::Name(field),
                annotation: Some(annotation),
                value,
                line,
            } = stmt
            else {
                continue;
            };
            if field.starts_with('_') || is_class_var(annotation) {
                continue;
            }

            let Some(tag) = type_tag(annotation) else {
                let err = ScanError::extraction_failure(
                    format!("field {}.{}", class.name, field),
                    format!("unsupported annotation `{}`", annotation.describe()),
                );
                let location = format!("{}:{}", entry.module.path.display(), line);
                warn!("{}: {}", location, err);
                diagnostics.push(Diagnostic::from_error(location, &err));
                continue;
            };

            let property = Property {
                schema_type: SchemaType::from_tag(&tag),
                description: value.as_ref().and_then(field_description),
            };
            shape.insert(field.clone(), property, value.is_none());
        }

        (shape, diagnostics)
    }

    pub fn shape(&self, name: &str) -> Option<&Shape> {
        self.models.get(name)
    }

    pub fn is_model(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// `dict`, `object`, `any` or a registered model name
    pub fn is_object_like(&self, tag: &str) -> bool {
        is_object_tag(tag) || self.is_model(tag)
    }

    pub fn models(&self) -> impl Iterator<Item = (&String, &Shape)> {
        self.models.iter()
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn is_class_var(annotation: &Expr) -> bool {
    let base = match annotation {
        Expr::Subscript { value, .. } => value.as_ref(),
        other => other,
    };
    base.last_name() == Some("ClassVar")
}

/// `Field(..., description="...")`
fn field_description(value: &Expr) -> Option<String> {
    let Expr::Call { func, .. } = value else {
        return None;
    };
    if func.last_name() != Some("Field") {
        return None;
    }
    match value.keyword("description") {
        Some(Expr::Str(description)) => Some(description.clone()),
        _ => None,
    }
}
