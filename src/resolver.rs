//! Reference resolution
//!
//! Resolves `$ref` pointers against the document cache, assigns one canonical
//! name per distinct schema document, and records alias edges for local
//! definitions that merely re-export another file's type.
//!
//! A `ReferenceResolver` lives for exactly one run. State accumulates
//! monotonically while `discover` walks the document closure; after that the
//! maps are read-only and the mutating `resolve` is not called again. The
//! read-only half (`lookup`, `canonical_name`, `external_schemas_used`) is
//! what traversal and the emitters consume.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{Result, SchemaError};
use crate::loader::{normalize_path, DocumentCache};
use crate::names::CanonicalNamer;
use crate::schema::{AdditionalProperties, SchemaNode};

/// A parsed schema pointer.
///
/// External pointers keep the text as written; the normalized target path is
/// computed against the referencing document when needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pointer {
    /// `#/definitions/<name>` within the current document
    Local(String),
    /// Relative file path to another document
    External(String),
}

impl Pointer {
    /// Parse pointer text. Fragment forms other than `#/definitions/<name>`
    /// are unsupported.
    pub fn parse(text: &str, document: &Path) -> Result<Pointer> {
        if let Some(name) = text.strip_prefix("#/definitions/") {
            if !name.is_empty() && !name.contains('/') {
                return Ok(Pointer::Local(name.to_string()));
            }
        }
        if text.starts_with('#') {
            return Err(SchemaError::UnsupportedReference {
                pointer: text.to_string(),
                document: document.to_path_buf(),
            });
        }
        Ok(Pointer::External(text.to_string()))
    }
}

/// Canonical name assigned to an external schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    /// Canonical PascalCase type name, derived from the filename
    pub name: String,
    /// Normalized path of the bound document
    pub path: PathBuf,
}

/// One external document reached during the run.
#[derive(Debug, Clone, Copy)]
pub struct ExternalSchema<'a> {
    pub path: &'a Path,
    pub document: &'a SchemaNode,
    pub name: &'a str,
}

/// Resolves pointers, builds canonical-name and alias maps.
pub struct ReferenceResolver {
    cache: DocumentCache,
    namer: CanonicalNamer,
    root_path: PathBuf,
    /// External document bindings keyed by normalized path, in first-reach order
    bindings: IndexMap<PathBuf, TypeBinding>,
    /// `(owning document, definition name) -> external pointer text` for local
    /// definitions whose entire body re-exports an external document
    aliases: HashMap<(PathBuf, String), String>,
    /// Definitions currently being resolved, for alias-chain cycle detection
    in_progress: HashSet<(PathBuf, String)>,
}

impl ReferenceResolver {
    /// Create a resolver for one run, loading the root document.
    pub fn new(root_path: &Path, mut cache: DocumentCache, namer: CanonicalNamer) -> Result<Self> {
        cache.load(root_path)?;
        Ok(Self {
            cache,
            namer,
            root_path: normalize_path(root_path),
            bindings: IndexMap::new(),
            aliases: HashMap::new(),
            in_progress: HashSet::new(),
        })
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// The root document's parsed tree.
    pub fn root(&self) -> &SchemaNode {
        self.cache
            .get(&self.root_path)
            .expect("root document is loaded at construction")
    }

    pub fn namer(&self) -> &CanonicalNamer {
        &self.namer
    }

    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Normalized target path of an external pointer relative to the
    /// document that references it.
    pub fn target_path(&self, pointer: &str, current_document: &Path) -> PathBuf {
        let dir = current_document.parent().unwrap_or_else(|| Path::new(""));
        normalize_path(&dir.join(pointer))
    }

    /// Resolve a pointer to its schema fragment, loading external documents
    /// as needed. Closure-discovery phase only.
    pub fn resolve(&mut self, pointer: &str, current_document: &Path) -> Result<SchemaNode> {
        match Pointer::parse(pointer, current_document)? {
            Pointer::Local(name) => {
                let doc_key = normalize_path(current_document);
                let node = self
                    .document(&doc_key)?
                    .definitions
                    .get(&name)
                    .cloned()
                    .ok_or_else(|| SchemaError::UnresolvedPointer {
                        pointer: pointer.to_string(),
                        document: current_document.to_path_buf(),
                    })?;

                let Some(inner) = node.reference.clone() else {
                    return Ok(node);
                };

                let guard = (doc_key.clone(), name.clone());
                if !self.in_progress.insert(guard.clone()) {
                    return Err(SchemaError::CyclicAlias {
                        pointer: pointer.to_string(),
                        document: current_document.to_path_buf(),
                    });
                }
                // Record the alias before recursing, so it is captured even
                // if nobody ever asks for this definition's name.
                if matches!(
                    Pointer::parse(&inner, current_document)?,
                    Pointer::External(_)
                ) {
                    self.aliases.entry(guard.clone()).or_insert(inner.clone());
                }
                let resolved = self.resolve(&inner, current_document);
                self.in_progress.remove(&guard);
                resolved
            }
            Pointer::External(relative) => {
                let target = self.target_path(&relative, current_document);
                let node = self.cache.load(&target)?.clone();
                self.register_binding(&target);
                Ok(node)
            }
        }
    }

    /// Idempotently pre-register an external pointer without loading its
    /// body. Local pointers are a no-op.
    pub fn add_external_ref(&mut self, pointer: &str, current_document: &Path) -> Result<()> {
        if let Pointer::External(relative) = Pointer::parse(pointer, current_document)? {
            let target = self.target_path(&relative, current_document);
            self.register_binding(&target);
        }
        Ok(())
    }

    fn register_binding(&mut self, target: &Path) {
        if !self.bindings.contains_key(target) {
            let binding = TypeBinding {
                name: self.namer.type_name_for_file(target),
                path: target.to_path_buf(),
            };
            tracing::debug!(path = %target.display(), name = %binding.name, "bound external schema");
            self.bindings.insert(target.to_path_buf(), binding);
        }
    }

    /// Read-only pointer resolution against already-loaded state.
    pub fn lookup(&self, pointer: &str, current_document: &Path) -> Result<&SchemaNode> {
        let doc_key = normalize_path(current_document);
        let mut text = pointer.to_string();
        let mut seen: HashSet<(PathBuf, String)> = HashSet::new();
        loop {
            match Pointer::parse(&text, current_document)? {
                Pointer::Local(name) => {
                    let node = self
                        .document(&doc_key)?
                        .definitions
                        .get(&name)
                        .ok_or_else(|| SchemaError::UnresolvedPointer {
                            pointer: pointer.to_string(),
                            document: current_document.to_path_buf(),
                        })?;
                    if !seen.insert((doc_key.clone(), name)) {
                        return Err(SchemaError::CyclicAlias {
                            pointer: pointer.to_string(),
                            document: current_document.to_path_buf(),
                        });
                    }
                    match &node.reference {
                        Some(inner) => text = inner.clone(),
                        None => return Ok(node),
                    }
                }
                Pointer::External(relative) => {
                    let target = self.target_path(&relative, &doc_key);
                    return self.document(&target).map_err(|_| {
                        SchemaError::UnresolvedPointer {
                            pointer: pointer.to_string(),
                            document: current_document.to_path_buf(),
                        }
                    });
                }
            }
        }
    }

    /// If the pointer ultimately designates an external document (directly,
    /// or through a chain of bare-reference definitions), its normalized
    /// path. `None` for genuinely local targets.
    pub fn external_target(
        &self,
        pointer: &str,
        current_document: &Path,
    ) -> Result<Option<PathBuf>> {
        let doc_key = normalize_path(current_document);
        let mut text = pointer.to_string();
        let mut seen: HashSet<String> = HashSet::new();
        loop {
            match Pointer::parse(&text, current_document)? {
                Pointer::External(relative) => {
                    return Ok(Some(self.target_path(&relative, &doc_key)));
                }
                Pointer::Local(name) => {
                    if !seen.insert(name.clone()) {
                        return Err(SchemaError::CyclicAlias {
                            pointer: pointer.to_string(),
                            document: current_document.to_path_buf(),
                        });
                    }
                    let node = self
                        .document(&doc_key)?
                        .definitions
                        .get(&name)
                        .ok_or_else(|| SchemaError::UnresolvedPointer {
                            pointer: pointer.to_string(),
                            document: current_document.to_path_buf(),
                        })?;
                    match &node.reference {
                        Some(inner) => text = inner.clone(),
                        None => return Ok(None),
                    }
                }
            }
        }
    }

    /// Canonical type name for a pointer: the bound document name for
    /// external targets (following alias chains), the definition's own name
    /// otherwise.
    pub fn canonical_name(&self, pointer: &str, current_document: &Path) -> Result<String> {
        let local_name = match Pointer::parse(pointer, current_document)? {
            Pointer::Local(name) => Some(name),
            Pointer::External(_) => None,
        };
        match self.external_target(pointer, current_document)? {
            Some(target) => self
                .bindings
                .get(&target)
                .map(|b| b.name.clone())
                .ok_or_else(|| SchemaError::UnresolvedPointer {
                    pointer: pointer.to_string(),
                    document: current_document.to_path_buf(),
                }),
            None => local_name.ok_or_else(|| SchemaError::UnresolvedPointer {
                pointer: pointer.to_string(),
                document: current_document.to_path_buf(),
            }),
        }
    }

    /// Every external document actually reached during the run, in
    /// first-reach order. The root document is excluded even when a
    /// reference cycle leads back to it: its types are defined by the main
    /// artifact.
    pub fn external_schemas_used(&self) -> Vec<ExternalSchema<'_>> {
        self.bindings
            .iter()
            .filter(|(path, _)| path.as_path() != self.root_path)
            .filter_map(|(path, binding)| {
                self.cache.get(path).map(|document| ExternalSchema {
                    path,
                    document,
                    name: &binding.name,
                })
            })
            .collect()
    }

    /// Whether a local definition of `document` is an alias for an external
    /// document.
    pub fn is_alias(&self, document: &Path, definition: &str) -> bool {
        self.aliases
            .contains_key(&(normalize_path(document), definition.to_string()))
    }

    /// Walk the full closure from `path`: resolve every pointer in every
    /// reachable document, loading and binding external documents. Document
    /// cycles terminate via the visited set.
    pub fn discover(&mut self, path: &Path) -> Result<()> {
        let mut pending = vec![normalize_path(path)];
        let mut visited: HashSet<PathBuf> = HashSet::new();

        while let Some(doc_path) = pending.pop() {
            if !visited.insert(doc_path.clone()) {
                continue;
            }
            let root = self.cache.load(&doc_path)?.clone();

            // Resolving each definition through its local pointer records
            // alias edges and catches cyclic bare-reference chains.
            for name in root.definitions.keys() {
                let local = format!("#/definitions/{name}");
                self.resolve(&local, &doc_path)?;
            }
            self.discover_subtree(&root, &doc_path)?;

            for target in self.bindings.keys() {
                if !visited.contains(target) && self.cache.get(target).is_some() {
                    pending.push(target.clone());
                }
            }
        }

        tracing::info!(
            root = %self.root_path.display(),
            documents = visited.len(),
            external = self.bindings.len(),
            "closure discovery complete"
        );
        Ok(())
    }

    fn discover_subtree(&mut self, node: &SchemaNode, document: &Path) -> Result<()> {
        if let Some(reference) = &node.reference {
            self.resolve(reference, document)?;
        }
        for child in node.properties.values() {
            self.discover_subtree(child, document)?;
        }
        for child in node.definitions.values() {
            self.discover_subtree(child, document)?;
        }
        if let Some(items) = &node.items {
            self.discover_subtree(items, document)?;
        }
        if let Some(AdditionalProperties::Schema(schema)) = &node.additional_properties {
            self.discover_subtree(schema, document)?;
        }
        for child in node
            .one_of
            .iter()
            .chain(&node.any_of)
            .chain(&node.all_of)
        {
            self.discover_subtree(child, document)?;
        }
        if let Some(not) = &node.not {
            self.discover_subtree(not, document)?;
        }
        Ok(())
    }

    fn document(&self, path: &Path) -> Result<&SchemaNode> {
        self.cache
            .get(path)
            .ok_or_else(|| SchemaError::UnresolvedPointer {
                pointer: path.display().to_string(),
                document: self.root_path.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_parse() {
        let doc = Path::new("a.json");
        assert_eq!(
            Pointer::parse("#/definitions/Foo", doc).unwrap(),
            Pointer::Local("Foo".to_string())
        );
        assert_eq!(
            Pointer::parse("./b.schema.json", doc).unwrap(),
            Pointer::External("./b.schema.json".to_string())
        );
        assert!(matches!(
            Pointer::parse("#/properties/x", doc),
            Err(SchemaError::UnsupportedReference { .. })
        ));
        assert!(matches!(
            Pointer::parse("#", doc),
            Err(SchemaError::UnsupportedReference { .. })
        ));
        assert!(matches!(
            Pointer::parse("#/definitions/a/b", doc),
            Err(SchemaError::UnsupportedReference { .. })
        ));
    }
}
