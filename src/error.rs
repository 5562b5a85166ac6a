//! Error types for schema resolution and code generation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema resolution and generation errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("schema file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unresolved pointer '{pointer}' referenced from {}", document.display())]
    UnresolvedPointer { pointer: String, document: PathBuf },

    #[error("unsupported reference format '{pointer}' in {}", document.display())]
    UnsupportedReference { pointer: String, document: PathBuf },

    #[error("cyclic alias chain through '{pointer}' in {}", document.display())]
    CyclicAlias { pointer: String, document: PathBuf },

    #[error("output file already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
