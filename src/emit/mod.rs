//! Code emitters
//!
//! One module per target language. Emitters are pure renderers: they consume
//! the descriptors produced by traversal plus the resolver's read-only name
//! lookups, and never chase pointers or load documents themselves.

pub mod csharp;
pub mod go;
pub mod python;
pub mod typescript;

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolver::ReferenceResolver;
use crate::schema::{AdditionalProperties, NameHints, SchemaNode};
use crate::traverse::TypeDescriptor;

/// Supported target languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    Python,
    #[value(alias = "ts")]
    Typescript,
    #[value(alias = "dotnet")]
    Csharp,
}

impl Language {
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::Python => "py",
            Language::Typescript => "ts",
            Language::Csharp => "cs",
        }
    }

    /// TypeScript and C# artifacts use PascalCase filenames.
    pub fn pascal_case_filenames(&self) -> bool {
        matches!(self, Language::Typescript | Language::Csharp)
    }
}

/// Everything an emitter may consult besides the descriptors themselves.
pub struct EmitContext<'a> {
    pub resolver: &'a ReferenceResolver,
    pub document_path: &'a Path,
    /// Go package name
    pub package: &'a str,
    /// C# namespace
    pub namespace: &'a str,
    /// Python: pydantic models vs plain dataclasses
    pub use_pydantic: bool,
}

/// Render one document for the target language.
pub fn emit_document(
    language: Language,
    root: &SchemaNode,
    descriptors: &[TypeDescriptor],
    ctx: &EmitContext<'_>,
) -> Result<String> {
    match language {
        Language::Go => go::emit(root, descriptors, ctx),
        Language::Python => python::emit(root, descriptors, ctx),
        Language::Typescript => typescript::emit(root, descriptors, ctx),
        Language::Csharp => csharp::emit(root, descriptors, ctx),
    }
}

/// Generated-file banner in the target language's comment syntax.
pub fn header_comment(language: Language) -> String {
    match language {
        Language::Go | Language::Typescript => {
            "// Code generated by schema2code. DO NOT EDIT.\n".to_string()
        }
        Language::Python => "# Code generated by schema2code. DO NOT EDIT.\n".to_string(),
        Language::Csharp => "// <auto-generated>\n\
             //     Code generated by schema2code. DO NOT EDIT.\n\
             // </auto-generated>\n"
            .to_string(),
    }
}

/// External documents referenced by this document, in first-occurrence order:
/// `(normalized path, canonical type name)`. Alias definitions count as
/// references to their target. The document itself is excluded.
pub fn external_imports(
    root: &SchemaNode,
    ctx: &EmitContext<'_>,
) -> Result<Vec<(PathBuf, String)>> {
    let mut found: IndexMap<PathBuf, String> = IndexMap::new();
    collect_imports(root, ctx, &mut found)?;
    let own = crate::loader::normalize_path(ctx.document_path);
    Ok(found
        .into_iter()
        .filter(|(path, _)| *path != own)
        .collect())
}

fn collect_imports(
    node: &SchemaNode,
    ctx: &EmitContext<'_>,
    found: &mut IndexMap<PathBuf, String>,
) -> Result<()> {
    if let Some(pointer) = &node.reference {
        if let Some(target) = ctx.resolver.external_target(pointer, ctx.document_path)? {
            if !found.contains_key(&target) {
                let name = ctx.resolver.canonical_name(pointer, ctx.document_path)?;
                found.insert(target, name);
            }
        }
        // Reference bodies carry no other keys worth scanning.
        return Ok(());
    }
    for child in node.properties.values() {
        collect_imports(child, ctx, found)?;
    }
    for child in node.definitions.values() {
        collect_imports(child, ctx, found)?;
    }
    if let Some(items) = &node.items {
        collect_imports(items, ctx, found)?;
    }
    if let Some(AdditionalProperties::Schema(schema)) = &node.additional_properties {
        collect_imports(schema, ctx, found)?;
    }
    for child in node.one_of.iter().chain(&node.any_of).chain(&node.all_of) {
        collect_imports(child, ctx, found)?;
    }
    if let Some(not) = &node.not {
        collect_imports(not, ctx, found)?;
    }
    Ok(())
}

/// Member name for an enum value: the `enumNames` hint when present, else
/// `VALUE_<n>` for integers and the uppercased text for strings. A leading
/// `<type name>` prefix in the hint is stripped.
pub fn enum_member_name(
    hints: Option<&NameHints>,
    value: &serde_json::Value,
    index: usize,
    type_name: Option<&str>,
) -> String {
    let mut name = match hints.and_then(|h| h.get(value, index)) {
        Some(hint) => hint.to_string(),
        None => match value {
            serde_json::Value::Number(n) => format!("VALUE_{n}"),
            serde_json::Value::String(s) => sanitize_member(&s.to_uppercase()),
            other => sanitize_member(&other.to_string().to_uppercase()),
        },
    };
    if let Some(prefix) = type_name {
        if name.len() > prefix.len() && name.starts_with(prefix) {
            name = name[prefix.len()..].to_string();
        }
    }
    name
}

/// Description for an enum value from `enumDescriptions`, if any.
pub fn enum_member_desc(
    hints: Option<&NameHints>,
    value: &serde_json::Value,
    index: usize,
) -> Option<String> {
    hints.and_then(|h| h.get(value, index)).map(str::to_string)
}

fn sanitize_member(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// The type name a property reference renders to.
pub fn ref_type_name(pointer: &str, ctx: &EmitContext<'_>) -> Result<String> {
    ctx.resolver.canonical_name(pointer, ctx.document_path)
}
