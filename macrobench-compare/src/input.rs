//! Result-file loading.
//!
//! Reads a macro-benchmark result file from disk and parses it into a JSON
//! document. Shape validation belongs to the core extractor; this module
//! only gets the bytes into memory.

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Errors from loading a benchmark result file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("Failed to read benchmark file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("Failed to parse benchmark file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load and parse a benchmark result file into a JSON document.
///
/// # Errors
///
/// Returns [`InputError::Io`] if the file cannot be read and
/// [`InputError::Json`] if it does not parse as JSON.
pub fn load_document(path: &Path) -> Result<Value, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| InputError::Json {
        path: path.to_path_buf(),
        source,
    })
}
