//! Source discovery and scanning
//!
//! Enumerates project scripts under the configured source roots and loads
//! them into [`SourceFile`]s. Reading and extraction run on the blocking
//! pool in parallel, but results always come back in discovery order.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::Semaphore;
use walkdir::WalkDir;

use crate::config::defaults;
use crate::core::config::ProjectConfig;
use crate::core::extractor::{extract, symbols_of, DeclarationKind};
use crate::error::FilesystemError;

/// A scanned project script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the project root, `/`-separated
    pub path: String,
    /// Raw file content
    pub text: String,
    /// Last modification time, when the platform reports one
    pub modified: Option<SystemTime>,
    /// Provided symbols in source order
    pub provides: Vec<String>,
    /// Required symbols in source order
    pub requires: Vec<String>,
}

impl SourceFile {
    /// Build a source file from its text
    pub fn from_text(path: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let declarations = extract(&text);
        Self {
            path: path.into(),
            provides: symbols_of(&declarations, DeclarationKind::Provide),
            requires: symbols_of(&declarations, DeclarationKind::Require),
            modified: None,
            text,
        }
    }

    /// First provided symbol, used to name the file in diagnostics
    pub fn primary_symbol(&self) -> Option<&str> {
        self.provides.first().map(String::as_str)
    }

    /// Human-readable label: path plus primary symbol when there is one
    pub fn label(&self) -> String {
        match self.primary_symbol() {
            Some(symbol) => format!("{} ({symbol})", self.path),
            None => self.path.clone(),
        }
    }
}

/// Normalize a path to a `/`-separated string
///
/// `.` segments are dropped and `..` cancels the segment before it. A `..`
/// with nothing left to cancel is kept, so paths leaving the root stay
/// distinct from paths inside it.
pub fn normalize(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut absolute = false;
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_string_lossy().into_owned()),
            Component::RootDir => absolute = true,
            Component::CurDir => {}
            Component::ParentDir => {
                if parts.last().is_some_and(|last| last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..".to_string());
                }
            }
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Directories never scanned, relative to the project root
fn excluded_dirs(config: &ProjectConfig) -> Vec<PathBuf> {
    let mut dirs = vec![
        config.paths.debug_dir.clone(),
        config.paths.production_dir.clone(),
        config.paths.library_root.clone(),
        config.paths.compiler_root.clone(),
        PathBuf::from(defaults::STAGING_DIR),
    ];
    dirs.extend(config.build.extern_paths());
    dirs
}

fn is_excluded(relative: &Path, excluded: &[PathBuf]) -> bool {
    let relative = normalize(relative);
    excluded.iter().any(|dir| {
        let dir = normalize(dir);
        !dir.is_empty() && (relative == dir || relative.starts_with(&format!("{dir}/")))
    })
}

/// Discover project scripts in deterministic order
///
/// Source roots are walked in configuration order with entries sorted by
/// name. Returns paths relative to the project root. Overlapping roots do
/// not produce duplicates.
pub fn discover(project_dir: &Path, config: &ProjectConfig) -> Result<Vec<PathBuf>, FilesystemError> {
    let excluded = excluded_dirs(config);
    let deps_js = normalize(&config.paths.deps_js());
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for root in &config.build.source_roots {
        let abs_root = project_dir.join(root);
        if !abs_root.is_dir() {
            tracing::warn!("Source root {} does not exist, skipping", root.display());
            continue;
        }

        let walker = WalkDir::new(&abs_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry
                    .path()
                    .strip_prefix(project_dir)
                    .map(|rel| !is_excluded(rel, &excluded))
                    .unwrap_or(false)
            });

        for entry in walker {
            let entry = entry.map_err(|e| FilesystemError::Walk {
                path: abs_root.clone(),
                error: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("js") {
                continue;
            }
            let Ok(relative) = path.strip_prefix(project_dir) else {
                continue;
            };
            let key = normalize(relative);
            if key == deps_js {
                continue;
            }
            if seen.insert(key) {
                found.push(relative.to_path_buf());
            }
        }
    }

    tracing::debug!("Discovered {} script(s)", found.len());
    Ok(found)
}

/// Read and extract a single script
pub fn load_source(project_dir: &Path, relative: &Path) -> Result<SourceFile, FilesystemError> {
    let abs = project_dir.join(relative);
    let text = std::fs::read_to_string(&abs).map_err(|e| FilesystemError::ReadFile {
        path: abs.clone(),
        error: e.to_string(),
    })?;
    let modified = std::fs::metadata(&abs).and_then(|m| m.modified()).ok();

    let mut source = SourceFile::from_text(normalize(relative), text);
    source.modified = modified;
    tracing::debug!(
        "Scanned {}: {} provide(s), {} require(s)",
        source.path,
        source.provides.len(),
        source.requires.len()
    );
    Ok(source)
}

/// Discover and scan all project scripts
///
/// Files are read in parallel; the returned vector is in discovery order.
pub async fn scan_sources(
    project_dir: &Path,
    config: &ProjectConfig,
) -> Result<Vec<SourceFile>, FilesystemError> {
    let paths = discover(project_dir, config)?;
    let permits = Arc::new(Semaphore::new(num_cpus::get().max(1)));

    let tasks = paths.into_iter().map(|relative| {
        let permits = Arc::clone(&permits);
        let project_dir = project_dir.to_path_buf();
        async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| FilesystemError::ReadFile {
                    path: relative.clone(),
                    error: e.to_string(),
                })?;
            let path = relative.clone();
            tokio::task::spawn_blocking(move || load_source(&project_dir, &relative))
                .await
                .map_err(|e| FilesystemError::ReadFile {
                    path,
                    error: e.to_string(),
                })?
        }
    });

    futures::future::try_join_all(tasks).await
}
