//! Artifact writing
//!
//! Writes the generated sources to disk with the original tool's modes:
//! create (overwrite) or append, with opt-out guards for creating missing
//! files and for overwriting existing ones.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Write the file, replacing existing content
    Create,
    /// Append to the file if it exists
    Append,
}

#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub mode: WriteMode,
    /// Create files that don't exist yet (`--no-create` disables)
    pub create_missing: bool,
    /// Replace existing files in create mode (`--no-overwrite` disables)
    pub overwrite: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            mode: WriteMode::Create,
            create_missing: true,
            overwrite: true,
        }
    }
}

/// Write every artifact, honoring mode and guards. Returns the number of
/// files actually written.
pub fn write_artifacts(
    artifacts: &IndexMap<PathBuf, String>,
    options: &WriteOptions,
) -> Result<usize> {
    let mut written = 0;
    for (path, content) in artifacts {
        let exists = path.exists();
        if !exists {
            if !options.create_missing {
                tracing::warn!(path = %path.display(), "skipping missing file (--no-create)");
                continue;
            }
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        match options.mode {
            WriteMode::Append if exists => {
                let mut file = OpenOptions::new().append(true).open(path)?;
                file.write_all(content.as_bytes())?;
            }
            _ => {
                if exists && !options.overwrite {
                    return Err(SchemaError::AlreadyExists { path: path.clone() });
                }
                fs::write(path, content)?;
            }
        }
        tracing::info!(path = %path.display(), bytes = content.len(), "wrote artifact");
        written += 1;
    }
    Ok(written)
}
