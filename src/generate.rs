//! Generation driver
//!
//! Orchestrates one run: load the root document, discover the reference
//! closure, then emit the main artifact plus exactly one artifact per
//! external document reached. Any resolution failure aborts the run with the
//! offending pointer and its source document.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::emit::{self, EmitContext, Language};
use crate::error::Result;
use crate::loader::DocumentCache;
use crate::names::{file_stem, pascal_case, CanonicalNamer, NamingConfig};
use crate::resolver::ReferenceResolver;
use crate::schema::SchemaNode;
use crate::traverse::enumerate;

/// Options for one generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub language: Language,
    /// Output path for the main artifact; external artifacts land beside it
    pub output: PathBuf,
    /// Go package name
    pub package: String,
    /// C# namespace
    pub namespace: String,
    /// Python: pydantic models instead of dataclasses
    pub use_pydantic: bool,
    pub naming: NamingConfig,
}

impl GenerateOptions {
    pub fn new(language: Language, output: impl Into<PathBuf>) -> Self {
        Self {
            language,
            output: output.into(),
            package: "main".to_string(),
            namespace: "SchemaTypes".to_string(),
            use_pydantic: true,
            naming: NamingConfig::default(),
        }
    }
}

/// Generate all artifacts for a schema file. Returns output path -> source
/// text, main artifact first, in deterministic order; nothing is written.
pub fn generate(
    schema_file: &Path,
    options: &GenerateOptions,
) -> Result<IndexMap<PathBuf, String>> {
    let namer = CanonicalNamer::new(options.naming.clone());
    let mut resolver = ReferenceResolver::new(schema_file, DocumentCache::new(), namer)?;
    resolver.discover(schema_file)?;

    let mut artifacts: IndexMap<PathBuf, String> = IndexMap::new();
    // Descriptor names per artifact stem, for the Python re-export module.
    let mut exports: Vec<(String, Vec<String>)> = Vec::new();

    let root = resolver.root().clone();
    let root_path = resolver.root_path().to_path_buf();
    let main_path = main_output_path(&options.output, options.language);
    let names = emit_one(&root, &root_path, &resolver, options, &mut artifacts, &main_path)?;
    exports.push((artifact_stem(&main_path), names));

    let output_dir = main_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    for external in resolver.external_schemas_used() {
        let stem = if options.language.pascal_case_filenames() {
            external.name.to_string()
        } else {
            file_stem(external.path)
        };
        let path = output_dir.join(format!("{stem}.{}", options.language.extension()));
        if artifacts.contains_key(&path) {
            continue;
        }
        let document = external.document.clone();
        let document_path = external.path.to_path_buf();
        let names = emit_one(
            &document,
            &document_path,
            &resolver,
            options,
            &mut artifacts,
            &path,
        )?;
        exports.push((stem, names));
    }

    if options.language == Language::Python {
        artifacts.insert(
            output_dir.join("__init__.py"),
            python_init_exports(&exports),
        );
    }

    tracing::info!(
        language = ?options.language,
        artifacts = artifacts.len(),
        "generation complete"
    );
    Ok(artifacts)
}

fn emit_one(
    document: &SchemaNode,
    document_path: &Path,
    resolver: &ReferenceResolver,
    options: &GenerateOptions,
    artifacts: &mut IndexMap<PathBuf, String>,
    output_path: &Path,
) -> Result<Vec<String>> {
    let descriptors = enumerate(document, resolver, document_path)?;
    let ctx = EmitContext {
        resolver,
        document_path,
        package: &options.package,
        namespace: &options.namespace,
        use_pydantic: options.use_pydantic,
    };
    let source = emit::emit_document(options.language, document, &descriptors, &ctx)?;
    artifacts.insert(output_path.to_path_buf(), source);
    Ok(descriptors.iter().map(|d| d.name.clone()).collect())
}

/// Basename of an artifact path without its single extension.
fn artifact_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// The main artifact path: TypeScript and C# outputs use PascalCase
/// basenames regardless of what was passed on the command line.
fn main_output_path(output: &Path, language: Language) -> PathBuf {
    if !language.pascal_case_filenames() {
        return output.to_path_buf();
    }
    let stem = pascal_case(&artifact_stem(output));
    let renamed = format!("{stem}.{}", language.extension());
    match output.parent() {
        Some(parent) => parent.join(renamed),
        None => PathBuf::from(renamed),
    }
}

/// `__init__.py` re-exporting every generated class, module by module.
fn python_init_exports(exports: &[(String, Vec<String>)]) -> String {
    let mut lines = vec![
        "# Code generated by schema2code. DO NOT EDIT.".to_string(),
        String::new(),
    ];
    let mut all: Vec<String> = Vec::new();
    for (module, names) in exports {
        if names.is_empty() {
            continue;
        }
        lines.push(format!("from .{module} import {}", names.join(", ")));
        all.extend(names.iter().cloned());
    }
    lines.push(String::new());
    let quoted: Vec<String> = all.iter().map(|n| format!("\"{n}\"")).collect();
    lines.push(format!("__all__ = [{}]", quoted.join(", ")));
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_output_path_pascal_cases_ts_and_cs() {
        assert_eq!(
            main_output_path(Path::new("out/chat_request.ts"), Language::Typescript),
            PathBuf::from("out/ChatRequest.ts")
        );
        assert_eq!(
            main_output_path(Path::new("out/chat_request.cs"), Language::Csharp),
            PathBuf::from("out/ChatRequest.cs")
        );
        assert_eq!(
            main_output_path(Path::new("out/chat_request.go"), Language::Go),
            PathBuf::from("out/chat_request.go")
        );
    }
}
