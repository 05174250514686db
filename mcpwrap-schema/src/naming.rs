//! Deterministic tool names
//!
//! `GET /users/{user_id}` → `getUsersByUserId`, `GET /health` → `getHealth`.

use mcpwrap_scanner::HttpMethod;
use std::collections::BTreeSet;

/// Upper-case the first character of each alphanumeric run and join them
fn pascal_case(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Name of a `{param}` or `{param:converter}` placeholder
pub fn placeholder_name(placeholder: &str) -> &str {
    placeholder.split(':').next().unwrap_or(placeholder).trim()
}

/// Name fragments of one path segment
///
/// A segment may mix literal text and placeholders, e.g. `report-{year}.csv`.
fn segment_fragment(segment: &str) -> String {
    let mut fragment = String::new();
    let mut rest = segment;
    while let Some(open) = rest.find('{') {
        fragment.push_str(&pascal_case(&rest[..open]));
        match rest[open..].find('}') {
            Some(close) => {
                let inner = &rest[open + 1..open + close];
                fragment.push_str("By");
                fragment.push_str(&pascal_case(placeholder_name(inner)));
                rest = &rest[open + close + 1..];
            }
            None => {
                rest = &rest[open + 1..];
            }
        }
    }
    fragment.push_str(&pascal_case(rest));
    fragment
}

/// Base tool name for a route: lowercase method followed by one fragment
/// per path segment
pub fn tool_name(method: HttpMethod, path: &str) -> String {
    let mut name = method.as_str().to_ascii_lowercase();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        name.push_str(&segment_fragment(segment));
    }
    name
}

/// Makes tool names unique in first-seen order
///
/// Every base name is reserved up front, so a route whose natural name
/// happens to look like a suffixed duplicate (`getItems2`) keeps it. The
/// first occurrence of a duplicated base keeps the base; each later one gets
/// the smallest suffix `2, 3, ...` that is neither reserved nor assigned.
#[derive(Debug, Default)]
pub struct NameAllocator {
    reserved: BTreeSet<String>,
    assigned: BTreeSet<String>,
}

impl NameAllocator {
    pub fn new<'a>(base_names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            reserved: base_names.into_iter().map(str::to_string).collect(),
            assigned: BTreeSet::new(),
        }
    }

    /// Claim a name for `base`; returns the name actually assigned
    pub fn claim(&mut self, base: &str) -> String {
        if self.assigned.insert(base.to_string()) {
            return base.to_string();
        }
        let mut suffix = 2usize;
        loop {
            let candidate = format!("{base}{suffix}");
            if !self.reserved.contains(&candidate) && !self.assigned.contains(&candidate) {
                self.assigned.insert(candidate.clone());
                return candidate;
            }
            suffix += 1;
        }
    }
}
