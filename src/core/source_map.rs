//! Source map fix-up
//!
//! The compiler records source paths relative to the directory it ran in
//! (the project root). The map lives in the debug tree, so its
//! `sourceRoot` must lead from there back to the project root for the
//! paths to resolve over HTTP.

use std::path::Path;

use serde_json::Value;

use crate::error::NskitError;
use crate::infra::filesystem::{read_file, write_file};

/// Set `sourceRoot` in a source map document
pub fn with_source_root(map: &str, source_root: &str) -> Result<String, serde_json::Error> {
    let mut value: Value = serde_json::from_str(map)?;
    if let Value::Object(fields) = &mut value {
        fields.insert(
            "sourceRoot".to_string(),
            Value::String(source_root.to_string()),
        );
    }
    serde_json::to_string(&value)
}

/// Rewrite the source map file at `path` in place
pub fn fix_source_root(path: &Path, source_root: &str) -> Result<(), NskitError> {
    let content = read_file(path)?;
    let fixed = with_source_root(&content, source_root).map_err(|e| NskitError::SourceMap {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;
    write_file(path, &fixed)?;
    Ok(())
}
