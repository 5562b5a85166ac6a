//! Type graph traversal
//!
//! Walks a document's definitions and properties, yielding a deduplicated,
//! ordered sequence of type descriptors. Runs after closure discovery, so it
//! only needs the resolver's read-only view.
//!
//! Order is stable across runs: definitions in source order, then types
//! surfaced from properties in source order (recursing into nested
//! containers), then the document's root type. No name is yielded twice, and
//! names that resolve to another document — directly or through an alias
//! chain — are marked visited without being yielded, so they are imported
//! instead of redefined.

use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::names::pascal_case;
use crate::resolver::ReferenceResolver;
use crate::schema::SchemaNode;

/// One unit of work handed to an emitter.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Canonical name of the type
    pub name: String,
    /// The resolved schema fragment to render
    pub node: SchemaNode,
    /// Whether the fragment declares enum values
    pub is_enum: bool,
}

impl TypeDescriptor {
    fn new(name: String, node: SchemaNode) -> Self {
        let is_enum = node.is_enum();
        Self {
            name,
            node,
            is_enum,
        }
    }
}

/// The name under which a document's root type is emitted: the title with
/// whitespace stripped, else the name derived from the filename.
pub fn root_type_name(
    root: &SchemaNode,
    resolver: &ReferenceResolver,
    document_path: &Path,
) -> String {
    if let Some(title) = &root.title {
        let compact: String = title.split_whitespace().collect();
        if !compact.is_empty() {
            return compact;
        }
    }
    let derived = resolver.namer().type_name_for_file(document_path);
    if derived.is_empty() {
        "Root".to_string()
    } else {
        derived
    }
}

/// Enumerate every type to emit for one document, each name exactly once.
pub fn enumerate(
    root: &SchemaNode,
    resolver: &ReferenceResolver,
    document_path: &Path,
) -> Result<Vec<TypeDescriptor>> {
    let mut walk = Walk {
        resolver,
        document_path,
        visited: HashSet::new(),
        out: Vec::new(),
    };

    // Reserve the root type's name up front so no property-derived type can
    // shadow it; the root descriptor itself is yielded last, matching the
    // generated file layout (definitions, nested types, root).
    let root_name = root_type_name(root, resolver, document_path);
    walk.visited.insert(root_name.clone());

    // Definitions in source order.
    for (name, node) in &root.definitions {
        if !walk.visited.insert(name.clone()) {
            continue;
        }
        if let Some(pointer) = &node.reference {
            if walk.is_import_only(node)? {
                // A re-export of another document: stays visited so property
                // scanning cannot re-emit it, but yields nothing here.
                continue;
            }
            let resolved = resolver.lookup(pointer, document_path)?;
            walk.out
                .push(TypeDescriptor::new(name.clone(), resolved.clone()));
        } else {
            walk.out.push(TypeDescriptor::new(name.clone(), node.clone()));
        }
    }

    // Anonymous types nested inside definition bodies.
    for (name, node) in &root.definitions {
        if !node.is_reference() {
            walk.scan_children(node, name)?;
        }
    }

    // Properties in source order, recursing into nested containers.
    walk.scan_children(root, &root_name)?;

    if !root.is_reference() {
        walk.out.push(TypeDescriptor::new(root_name, root.clone()));
    }
    Ok(walk.out)
}

struct Walk<'a> {
    resolver: &'a ReferenceResolver,
    document_path: &'a Path,
    visited: HashSet<String>,
    out: Vec<TypeDescriptor>,
}

impl Walk<'_> {
    /// Whether a reference node's target lives in another document.
    fn is_import_only(&self, node: &SchemaNode) -> Result<bool> {
        match &node.reference {
            Some(pointer) => Ok(self
                .resolver
                .external_target(pointer, self.document_path)?
                .is_some()),
            None => Ok(false),
        }
    }

    fn scan_candidate(&mut self, candidate: String, node: &SchemaNode) -> Result<()> {
        if let Some(pointer) = &node.reference {
            if self.is_import_only(node)? {
                // Defined in another document's artifact; remember the name so
                // it is never re-emitted here.
                let name = self.resolver.canonical_name(pointer, self.document_path)?;
                self.visited.insert(name);
                return Ok(());
            }
            let name = self.resolver.canonical_name(pointer, self.document_path)?;
            if self.visited.contains(&name) {
                return Ok(());
            }
            let resolved = self.resolver.lookup(pointer, self.document_path)?.clone();
            if resolved.is_object_with_properties() || resolved.is_enum() {
                self.visited.insert(name.clone());
                self.out
                    .push(TypeDescriptor::new(name.clone(), resolved.clone()));
            }
            self.scan_children(&resolved, &name)?;
            return Ok(());
        }

        if node.is_object_with_properties() || node.is_enum() {
            if self.visited.insert(candidate.clone()) {
                self.out
                    .push(TypeDescriptor::new(candidate.clone(), node.clone()));
                self.scan_children(node, &candidate)?;
            }
            return Ok(());
        }

        // Scalar or array: nothing to yield, but deeper anonymous types still
        // surface through items.
        if let Some(items) = &node.items {
            self.scan_candidate(format!("{candidate}Item"), items)?;
        }
        Ok(())
    }

    /// Recurse into a node's properties and items with the same rules.
    fn scan_children(&mut self, node: &SchemaNode, hint: &str) -> Result<()> {
        for (child_name, child) in &node.properties {
            self.scan_candidate(pascal_case(child_name), child)?;
        }
        if let Some(items) = &node.items {
            self.scan_candidate(format!("{hint}Item"), items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DocumentCache;
    use crate::names::CanonicalNamer;
    use std::io::Write;
    use std::path::PathBuf;

    fn resolver_for(json: &str) -> (ReferenceResolver, PathBuf, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("root.schema.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let mut resolver =
            ReferenceResolver::new(&path, DocumentCache::new(), CanonicalNamer::default())
                .unwrap();
        resolver.discover(&path).unwrap();
        (resolver, path, dir)
    }

    fn names(descriptors: &[TypeDescriptor]) -> Vec<&str> {
        descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_inline_object_property_yields_two_descriptors() {
        let (resolver, path, _dir) = resolver_for(
            r#"{
                "title": "ChatRequest",
                "type": "object",
                "properties": {
                    "message": {
                        "type": "object",
                        "properties": {"text": {"type": "string"}}
                    }
                }
            }"#,
        );
        let root = resolver.root().clone();
        let descriptors = enumerate(&root, &resolver, &path).unwrap();
        assert_eq!(names(&descriptors), vec!["Message", "ChatRequest"]);
        assert!(!descriptors[0].is_enum);
    }

    #[test]
    fn test_definitions_then_properties_order() {
        let (resolver, path, _dir) = resolver_for(
            r##"{
                "title": "Order",
                "type": "object",
                "definitions": {
                    "LineItem": {
                        "type": "object",
                        "properties": {"sku": {"type": "string"}}
                    },
                    "Status": {"type": "string", "enum": ["open", "closed"]}
                },
                "properties": {
                    "status": {"$ref": "#/definitions/Status"},
                    "shipping": {
                        "type": "object",
                        "properties": {"carrier": {"type": "string"}}
                    }
                }
            }"##,
        );
        let root = resolver.root().clone();
        let descriptors = enumerate(&root, &resolver, &path).unwrap();
        assert_eq!(
            names(&descriptors),
            vec!["LineItem", "Status", "Shipping", "Order"]
        );
        let status = descriptors.iter().find(|d| d.name == "Status").unwrap();
        assert!(status.is_enum);
    }

    #[test]
    fn test_no_name_yielded_twice() {
        let (resolver, path, _dir) = resolver_for(
            r##"{
                "title": "Wrapper",
                "type": "object",
                "definitions": {
                    "Message": {
                        "type": "object",
                        "properties": {"text": {"type": "string"}}
                    }
                },
                "properties": {
                    "first": {"$ref": "#/definitions/Message"},
                    "second": {"$ref": "#/definitions/Message"},
                    "message": {
                        "type": "object",
                        "properties": {"other": {"type": "string"}}
                    }
                }
            }"##,
        );
        let root = resolver.root().clone();
        let descriptors = enumerate(&root, &resolver, &path).unwrap();
        // "Message" appears once, from the definition; the inline "message"
        // property may not re-use the name.
        assert_eq!(names(&descriptors), vec!["Message", "Wrapper"]);
    }

    #[test]
    fn test_array_items_surface_anonymous_types() {
        let (resolver, path, _dir) = resolver_for(
            r#"{
                "title": "Conversation",
                "type": "object",
                "properties": {
                    "messages": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {"role": {"type": "string"}}
                        }
                    },
                    "tags": {"type": "array", "items": {"type": "string"}}
                }
            }"#,
        );
        let root = resolver.root().clone();
        let descriptors = enumerate(&root, &resolver, &path).unwrap();
        assert_eq!(names(&descriptors), vec!["MessagesItem", "Conversation"]);
    }

    #[test]
    fn test_enumerate_is_deterministic() {
        let source = r##"{
            "title": "Doc",
            "type": "object",
            "definitions": {
                "B": {"type": "object", "properties": {"x": {"type": "string"}}},
                "A": {"type": "object", "properties": {"y": {"type": "string"}}}
            },
            "properties": {
                "b": {"$ref": "#/definitions/B"},
                "a": {"$ref": "#/definitions/A"}
            }
        }"##;
        let (resolver, path, _dir) = resolver_for(source);
        let root = resolver.root().clone();
        let first = names(&enumerate(&root, &resolver, &path).unwrap())
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let second = names(&enumerate(&root, &resolver, &path).unwrap())
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        assert_eq!(first, vec!["B", "A", "Doc"]);
        assert_eq!(first, second);
    }
}
