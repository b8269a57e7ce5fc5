//! Output tree staging
//!
//! Copies the development tree into an output tree and rewrites its HTML
//! pages so they load the compiled bundle instead of the development
//! loader. Development-only entries (test runner, vendored tooling, raw
//! scripts) are left behind.

use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::config::ProjectConfig;
use crate::core::walker::normalize;
use crate::error::FilesystemError;
use crate::infra::filesystem::{copy_tree, read_file, write_file};

/// Extensions of pages rewritten during staging
pub const PAGE_EXTENSIONS: &[&str] = &["html", "xhtml"];

/// Line marker for the library bootstrap script tag
pub const BASE_JS_MARKER: &str = "<!--@base_js@-->";

/// Line marker for the dependency manifest script tag
pub const DEPS_JS_MARKER: &str = "<!--@deps_js@-->";

/// Line marker replaced by the compiled bundle script tag
pub const REQUIRE_MAIN_MARKER: &str = "<!--@require_main@-->";

/// Rewrite a development page for an output tree
///
/// Marked loader lines are dropped and the main-script line becomes a
/// script tag for `compiled_js`, keeping its indentation.
pub fn rewrite_page(content: &str, compiled_js: &str) -> String {
    let mut out = String::with_capacity(content.len());
    for line in content.split_inclusive('\n') {
        if line.contains(BASE_JS_MARKER) || line.contains(DEPS_JS_MARKER) {
            continue;
        }
        if line.contains(REQUIRE_MAIN_MARKER) {
            let indent: String = line.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
            out.push_str(&format!("{indent}<script src=\"{compiled_js}\"></script>\n"));
            continue;
        }
        out.push_str(line);
    }
    out
}

/// Paths under the development tree that never reach an output tree
///
/// Output trees, the staging area and the project config are listed too,
/// since they sit inside the development tree when it is the project root.
fn development_only(config: &ProjectConfig) -> Vec<String> {
    let paths = &config.paths;
    [
        paths.testrunner.clone(),
        paths.library_root.clone(),
        paths.compiler_root.clone(),
        paths.js_dev_dir.clone(),
        paths.production_dir.clone(),
        paths.debug_dir.clone(),
        PathBuf::from(defaults::STAGING_DIR),
        PathBuf::from(defaults::CONFIG_FILE),
    ]
    .iter()
    .map(|p| normalize(p))
    .filter(|p| !p.is_empty())
    .collect()
}

fn is_page(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| PAGE_EXTENSIONS.contains(&ext))
}

/// Copy the development tree into `target` and rewrite its pages
///
/// Returns the copied files, relative to `target`.
pub fn stage_resources(
    project_dir: &Path,
    config: &ProjectConfig,
    target: &Path,
) -> Result<Vec<PathBuf>, FilesystemError> {
    let development = project_dir.join(&config.paths.development_dir);
    let skipped = development_only(config);
    let dev_prefix = config.paths.development_dir.clone();

    let copied = copy_tree(&development, target, |relative| {
        let from_root = normalize(&dev_prefix.join(relative));
        skipped
            .iter()
            .any(|s| from_root == *s || from_root.starts_with(&format!("{s}/")))
    })?;

    let compiled_js = normalize(&config.build.compiled_output_path);
    for relative in copied.iter().filter(|p| is_page(p)) {
        let path = target.join(relative);
        let content = read_file(&path)?;
        write_file(&path, &rewrite_page(&content, &compiled_js))?;
        tracing::debug!("Rewrote page {}", relative.display());
    }

    Ok(copied)
}
