//! Canonical name derivation
//!
//! Builds the canonical PascalCase type name for a schema file or field name.
//! Name derivation is language-AGNOSTIC: it determines canonical names only;
//! language-specific rendering (Go acronym casing, Python modules) builds on
//! top of it.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Naming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Strip a leading `U` from schema filenames before casing. A convention
    /// of the original schema corpus (`Uchat_request.schema.json` names the
    /// `ChatRequest` type); disable for corpora that don't follow it.
    pub strip_leading_u: bool,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            strip_leading_u: true,
        }
    }
}

/// Derives canonical type names from file and field names.
#[derive(Debug, Clone, Default)]
pub struct CanonicalNamer {
    config: NamingConfig,
}

impl CanonicalNamer {
    pub fn new(config: NamingConfig) -> Self {
        Self { config }
    }

    /// Canonical type name for a schema file path.
    ///
    /// `model_details.schema.json` -> `ModelDetails`, `b.schema.yaml` -> `B`.
    pub fn type_name_for_file(&self, path: &Path) -> String {
        let stem = file_stem(path);
        let stem = if self.config.strip_leading_u {
            stem.strip_prefix('U').unwrap_or(stem.as_str())
        } else {
            stem.as_str()
        };
        pascal_case(stem)
    }
}

/// File stem with schema extensions stripped: `b.schema.json` -> `b`.
pub fn file_stem(path: &Path) -> String {
    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let mut stem = file_name;
    loop {
        let trimmed = stem
            .strip_suffix(".json")
            .or_else(|| stem.strip_suffix(".yaml"))
            .or_else(|| stem.strip_suffix(".yml"))
            .or_else(|| stem.strip_suffix(".schema"));
        match trimmed {
            Some(t) => stem = t,
            None => break,
        }
    }
    stem.to_string()
}

/// Convert `snake_case`/`kebab-case` to PascalCase.
///
/// Capitalizes each segment's first letter and preserves the rest, so the
/// function is idempotent: `pascal_case("ModelDetails") == "ModelDetails"`.
pub fn pascal_case(raw: &str) -> String {
    raw.split(['_', '-'])
        .filter(|segment| !segment.is_empty())
        .map(capitalize)
        .collect()
}

/// Convert `snake_case`/PascalCase to camelCase.
pub fn camel_case(raw: &str) -> String {
    let pascal = pascal_case(raw);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Acronyms preserved in Go field names, per Go naming convention.
fn go_acronym(word: &str) -> Option<&'static str> {
    const ACRONYMS: &[(&str, &str)] = &[
        ("id", "ID"),
        ("url", "URL"),
        ("uri", "URI"),
        ("api", "API"),
        ("ui", "UI"),
        ("uid", "UID"),
        ("uuid", "UUID"),
        ("http", "HTTP"),
        ("https", "HTTPS"),
        ("html", "HTML"),
        ("css", "CSS"),
        ("json", "JSON"),
        ("xml", "XML"),
        ("yaml", "YAML"),
        ("sql", "SQL"),
        ("db", "DB"),
        ("ip", "IP"),
        ("tcp", "TCP"),
        ("udp", "UDP"),
    ];
    ACRONYMS
        .iter()
        .find(|(lower, _)| *lower == word)
        .map(|(_, upper)| *upper)
}

/// Convert a property name to a Go field name: PascalCase with acronyms
/// uppercased (`user_id` -> `UserID`, `apiKey` -> `APIKey`).
pub fn go_field_name(name: &str) -> String {
    let words: Vec<String> = if name.contains('_') || name.contains('-') {
        name.split(['_', '-'])
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        split_camel(name)
    };

    words
        .iter()
        .map(|word| match go_acronym(&word.to_ascii_lowercase()) {
            Some(acronym) => acronym.to_string(),
            None => capitalize(word),
        })
        .collect()
}

/// Split a camelCase/PascalCase identifier into words.
fn split_camel(name: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c.is_ascii_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
