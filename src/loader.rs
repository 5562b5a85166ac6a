//! Schema document loading
//!
//! Loads JSON or YAML schema files into `SchemaNode` trees, memoized by
//! normalized path so each distinct document is read at most once per run.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SchemaError};
use crate::schema::SchemaNode;

/// Memoizing loader for schema documents.
///
/// Scoped to a single generation run; nothing persists across runs.
#[derive(Debug, Default)]
pub struct DocumentCache {
    documents: HashMap<PathBuf, SchemaNode>,
    /// Number of underlying file reads performed (cache misses).
    loads: u64,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document, reading the file only on the first request for its
    /// normalized path.
    pub fn load(&mut self, path: &Path) -> Result<&SchemaNode> {
        let key = normalize_path(path);
        if !self.documents.contains_key(&key) {
            let node = self.read_document(&key)?;
            self.documents.insert(key.clone(), node);
        }
        Ok(&self.documents[&key])
    }

    /// A document previously loaded through this cache, if any.
    pub fn get(&self, path: &Path) -> Option<&SchemaNode> {
        self.documents.get(&normalize_path(path))
    }

    /// How many file reads this cache has performed.
    pub fn load_count(&self) -> u64 {
        self.loads
    }

    fn read_document(&mut self, path: &Path) -> Result<SchemaNode> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SchemaError::NotFound {
                path: path.to_path_buf(),
            },
            _ => SchemaError::Io(e),
        })?;
        self.loads += 1;
        tracing::debug!(path = %path.display(), "loading schema document");

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| SchemaError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        } else {
            serde_json::from_str(&content).map_err(|e| SchemaError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    }
}

/// Lexically normalize a path: resolve `.` and pop `..` components.
///
/// No symlink or filesystem resolution; two relative spellings of the same
/// file normalize to the same key.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("a/b/../c.json")),
            PathBuf::from("a/c.json")
        );
        assert_eq!(
            normalize_path(Path::new("./a/./b.json")),
            PathBuf::from("a/b.json")
        );
        assert_eq!(
            normalize_path(Path::new("/root/x/../y.json")),
            PathBuf::from("/root/y.json")
        );
    }

    #[test]
    fn test_load_memoized_across_spellings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.schema.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"title": "A", "type": "object"}}"#).unwrap();

        let mut cache = DocumentCache::new();
        cache.load(&path).unwrap();
        // Same file through a different spelling: no second read.
        let alias = dir.path().join("sub").join("..").join("a.schema.json");
        let node = cache.load(&alias).unwrap();
        assert_eq!(node.title.as_deref(), Some("A"));
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let mut cache = DocumentCache::new();
        let err = cache.load(Path::new("/nonexistent/x.json")).unwrap_err();
        assert!(matches!(err, SchemaError::NotFound { .. }));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let mut cache = DocumentCache::new();
        let err = cache.load(&path).unwrap_err();
        assert!(matches!(err, SchemaError::Parse { .. }));
    }

    #[test]
    fn test_yaml_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.schema.yaml");
        std::fs::write(&path, "title: FromYaml\ntype: object\n").unwrap();

        let mut cache = DocumentCache::new();
        let node = cache.load(&path).unwrap();
        assert_eq!(node.title.as_deref(), Some("FromYaml"));
    }
}
