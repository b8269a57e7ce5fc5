//! Development dependency manifest (deps.js)
//!
//! Loaded by the browser right after the library's `base.js`, it registers
//! every project script with the module loader so scripts are fetched in
//! build plan order. Paths are relative to the directory of `base.js`.

use std::path::Path;

use crate::core::config::ProjectConfig;
use crate::core::resolver::BuildPlan;
use crate::core::walker::normalize;

/// Header written at the top of the generated manifest
pub const DEPS_HEADER: &str = "// This file was autogenerated by nskit.\n// Please do not edit.\n";

/// Relative `/`-separated path from directory `from` to `to`
///
/// Both paths are relative to the same root. A `from` that climbs above
/// that root can only be answered with [`relative_in`].
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from = normalize(from);
    let to = normalize(to);
    let from: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = std::iter::repeat("..").take(from.len() - common).collect();
    parts.extend(&to[common..]);
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Relative path from `from` to `to`, both given relative to `root`
///
/// Both are anchored at the canonical `root` first, so a `from` outside the
/// project (`../shared/lib`) walks back in through the project's own name.
pub fn relative_in(root: &Path, from: &Path, to: &Path) -> String {
    let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    relative_path(&root.join(from), &root.join(to))
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn quote_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Render the manifest for a build plan
///
/// `project_dir` anchors the library location when it lies outside the
/// project.
pub fn render_deps(plan: &BuildPlan, config: &ProjectConfig, project_dir: &Path) -> String {
    let base_dir = config
        .paths
        .base_js()
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let mut out = String::from(DEPS_HEADER);
    for file in plan.files() {
        let path = relative_in(project_dir, &base_dir, Path::new(&file.path));
        out.push_str(&format!(
            "goog.addDependency({}, {}, {}, {{}});\n",
            quote(&path),
            quote_list(&file.provides),
            quote_list(&file.requires),
        ));
    }
    out
}
