//! Command handlers for CLI subcommands
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

mod draft;
mod refs;
mod validate;

pub use draft::handle_draft;
pub use refs::handle_refs;
pub use validate::handle_validate;

use crate::error::{Error, Result};
use draftcheck_schemas::{EngineConfig, SchemaEngine};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false)
}

/// Read a JSON or YAML document, chosen by file extension
pub(crate) fn read_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    debug!(file = %path.display(), bytes = content.len(), "Read document");

    if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
            reason: e.to_string(),
        })
    } else {
        draftcheck_schemas::parse(&content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Build an engine around the schema at `path`.
///
/// The file location becomes the base for relative `$ref` targets.
pub(crate) fn load_engine(path: &Path, config: EngineConfig) -> Result<SchemaEngine> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut engine = SchemaEngine::with_config(config);
    engine.load_schema(&path.to_string_lossy())?;
    debug!(
        schema = %path.display(),
        draft = ?engine.version(),
        base = ?engine.base_uri().map(|u| u.as_str()),
        "Schema loaded"
    );
    Ok(engine)
}
