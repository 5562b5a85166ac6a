//! schema2code
//!
//! Generates Go, Python, TypeScript and C# types from JSON/YAML schema
//! documents, including documents split across files via `$ref` pointers.
//!
//! ## Architecture
//!
//! ```text
//! schema file(s)
//!   └── DocumentCache      one memoized load per distinct path
//!         └── ReferenceResolver   pointer chasing, canonical names, aliases
//!               └── TypeGraphTraversal   ordered, deduplicated descriptors
//!                     └── Emitters   pure TypeDescriptor -> source text
//!                           └── Writer   artifact files on disk
//! ```
//!
//! The resolver is the single owner of reference semantics: it assigns one
//! canonical name per distinct schema document, collapses local definitions
//! that merely re-export another file's type, and exposes a read-only view
//! the traversal and emitters share. Each canonical name is defined in
//! exactly one generated artifact and imported everywhere else.

pub mod emit;
pub mod error;
pub mod generate;
pub mod loader;
pub mod names;
pub mod resolver;
pub mod schema;
pub mod traverse;
pub mod writer;

pub use emit::Language;
pub use error::{Result, SchemaError};
pub use generate::{generate, GenerateOptions};
pub use loader::DocumentCache;
pub use names::{CanonicalNamer, NamingConfig};
pub use resolver::{Pointer, ReferenceResolver, TypeBinding};
pub use schema::SchemaNode;
pub use traverse::{enumerate, TypeDescriptor};
pub use writer::{write_artifacts, WriteMode, WriteOptions};
