//! Filesystem operations
//!
//! Handles file and directory operations. Artifacts that must never be
//! observed half-written go through [`write_file_atomic`] or are built in
//! a staging directory and moved into place with [`replace_dir`].

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a directory and all its contents
pub fn remove_dir_all(path: &Path) -> Result<(), FilesystemError> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}

/// Write content to a file
pub fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Write content to a sibling temporary file, then rename it over `path`
pub fn write_file_atomic(path: &Path, content: &str) -> Result<(), FilesystemError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    write_file(&tmp, content)?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        FilesystemError::Rename {
            from: tmp.clone(),
            to: path.to_path_buf(),
            error: e.to_string(),
        }
    })
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Recursively copy `src` into `dst`, merging into existing directories
///
/// `skip` receives paths relative to `src`; a skipped directory is not
/// descended into. Returns the copied files relative to `src`.
pub fn copy_tree<F>(src: &Path, dst: &Path, skip: F) -> Result<Vec<PathBuf>, FilesystemError>
where
    F: Fn(&Path) -> bool,
{
    create_dir_all(dst)?;
    if !src.is_dir() {
        return Ok(Vec::new());
    }

    let mut copied = Vec::new();
    let walker = WalkDir::new(src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry
                .path()
                .strip_prefix(src)
                .map(|rel| !skip(rel))
                .unwrap_or(false)
        });

    for entry in walker {
        let entry = entry.map_err(|e| FilesystemError::Walk {
            path: src.to_path_buf(),
            error: e.to_string(),
        })?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            std::fs::copy(entry.path(), &target).map_err(|e| FilesystemError::Copy {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                error: e.to_string(),
            })?;
            copied.push(relative.to_path_buf());
        }
    }

    Ok(copied)
}

/// Rename `from` to `to`, creating the parent of `to`
pub fn rename(from: &Path, to: &Path) -> Result<(), FilesystemError> {
    if let Some(parent) = to.parent() {
        create_dir_all(parent)?;
    }
    std::fs::rename(from, to).map_err(|e| FilesystemError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        error: e.to_string(),
    })
}

/// Move a fully built `staged` directory to `target`, replacing it
pub fn replace_dir(staged: &Path, target: &Path) -> Result<(), FilesystemError> {
    remove_dir_all(target)?;
    rename(staged, target)
}
