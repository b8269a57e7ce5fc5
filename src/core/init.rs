//! Project initialization logic
//!
//! Materializes the starter tree of a new project: the config file, the
//! development directory with a page and an entry script, and the
//! `.gitignore` entries for generated output.

use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::core::config::ProjectConfig;
use crate::core::deps::relative_path;
use crate::core::resources::{BASE_JS_MARKER, DEPS_JS_MARKER, REQUIRE_MAIN_MARKER};
use crate::core::walker::normalize;
use crate::error::InitError;

/// Entries to add to .gitignore
pub const GITIGNORE_ENTRIES: &[&str] = &[
    "debug/",
    "production/",
    "closure/library/",
    ".nskit/",
    "development/js_dev/deps.js",
];

/// Marker comment for the nskit section in .gitignore
pub const GITIGNORE_MARKER: &str = "# nskit";

/// Symbol provided by the starter script
pub const MAIN_SYMBOL: &str = "main";

/// Result of initialization
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created config file
    pub config_path: PathBuf,
    /// Template files written, relative to the project root
    pub created: Vec<PathBuf>,
    /// Whether an existing .gitignore was updated rather than created
    pub gitignore_existed: bool,
}

/// A file written by `init`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Path relative to the project root
    pub path: PathBuf,
    pub content: String,
}

/// Generate the default config content with comments
pub fn generate_config_content(project_name: &str) -> String {
    format!(
        r#"# nskit project configuration

[project]
name = "{project_name}"

[build]
# Directories scanned for goog.provide / goog.require
source_roots = ["{js_dev}"]
# Bundle path inside the production and debug trees
compiled_output_path = "{compiled}"
# Also produce the debug tree and a source map
debug = false
# Symbols supplied outside the project; "prefix.*" covers a namespace
externs = ["goog.*"]
compilation_level = "{level}"

# [paths]
# development_dir = "{development}"
# debug_dir = "{debug}"
# production_dir = "{production}"
# library_root = "{library}"
# compiler_root = "{compiler}"

# [tools]
# compiler_command = ["java", "-jar", "closure/compiler/compiler.jar"]
"#,
        js_dev = defaults::JS_DEV_DIR,
        compiled = defaults::COMPILED_OUTPUT_PATH,
        level = defaults::COMPILATION_LEVEL,
        development = defaults::DEVELOPMENT_DIR,
        debug = defaults::DEBUG_DIR,
        production = defaults::PRODUCTION_DIR,
        library = defaults::LIBRARY_ROOT,
        compiler = defaults::COMPILER_ROOT,
    )
}

/// Generate the starter page, wired to the development loader
pub fn generate_index_page(config: &ProjectConfig) -> String {
    let development = &config.paths.development_dir;
    let base_js = relative_path(development, &config.paths.base_js());
    let deps_js = relative_path(development, &config.paths.deps_js());

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>nskit</title>
    <script src="{base_js}"></script>{BASE_JS_MARKER}
    <script src="{deps_js}"></script>{DEPS_JS_MARKER}
    <script>goog.require('{MAIN_SYMBOL}');</script>{REQUIRE_MAIN_MARKER}
  </head>
  <body>
  </body>
</html>
"#
    )
}

/// Generate the starter entry script
pub fn generate_main_script() -> String {
    format!(
        "goog.provide('{MAIN_SYMBOL}');\n\ngoog.require('goog.dom');\n\n\
         {MAIN_SYMBOL}.start = function() {{\n  \
         goog.dom.appendChild(document.body, goog.dom.createDom('p', null, 'Hello'));\n}};\n\n\
         {MAIN_SYMBOL}.start();\n"
    )
}

/// Files written by `init` for the default layout
pub fn template_files(project_name: &str) -> Vec<TemplateFile> {
    let config = ProjectConfig::default();
    vec![
        TemplateFile {
            path: PathBuf::from(defaults::CONFIG_FILE),
            content: generate_config_content(project_name),
        },
        TemplateFile {
            path: config.paths.development_dir.join("index.html"),
            content: generate_index_page(&config),
        },
        TemplateFile {
            path: config.paths.js_dev_dir.join("main.js"),
            content: generate_main_script(),
        },
    ]
}

/// Template entries already present in `path`
pub fn find_conflicts(path: &Path, templates: &[TemplateFile]) -> Vec<String> {
    templates
        .iter()
        .filter(|t| path.join(&t.path).exists())
        .map(|t| normalize(&t.path))
        .collect()
}

/// Generate .gitignore content for nskit
pub fn generate_gitignore_content() -> String {
    let mut content = String::from(GITIGNORE_MARKER);
    content.push('\n');
    for entry in GITIGNORE_ENTRIES {
        content.push_str(entry);
        content.push('\n');
    }
    content
}

/// Append nskit entries to existing .gitignore content
pub fn append_gitignore_entries(existing: &str) -> String {
    if existing.contains(GITIGNORE_MARKER) {
        return existing.to_string();
    }

    let mut result = existing.to_string();
    if !result.is_empty() && !result.ends_with('\n') {
        result.push('\n');
    }
    if !result.is_empty() {
        result.push('\n');
    }
    result.push_str(&generate_gitignore_content());
    result
}

/// Derive project name from directory
pub fn derive_project_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(ToString::to_string)
        .unwrap_or_else(|| "my-app".to_string())
}

/// Validate initialization can proceed
pub fn validate_init(path: &Path, templates: &[TemplateFile]) -> Result<(), InitError> {
    if !path.is_dir() {
        return Err(InitError::DirectoryNotFound {
            path: path.to_path_buf(),
        });
    }

    let names = find_conflicts(path, templates);
    if !names.is_empty() {
        return Err(InitError::Conflict { names });
    }
    Ok(())
}

fn write(path: &Path, content: &str) -> Result<(), InitError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| InitError::IoError {
            path: parent.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    std::fs::write(path, content).map_err(|e| InitError::IoError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Write the starter tree into `path`
///
/// Nothing is written when a template entry already exists.
pub fn initialize(path: &Path) -> Result<InitResult, InitError> {
    let templates = template_files(&derive_project_name(path));
    validate_init(path, &templates)?;

    // Config last, so a partial init still reads as uninitialized
    let mut created = Vec::new();
    for template in templates.iter().rev() {
        write(&path.join(&template.path), &template.content)?;
        created.push(template.path.clone());
    }
    created.reverse();

    let gitignore_path = path.join(".gitignore");
    let gitignore_existed = gitignore_path.exists();
    let gitignore = if gitignore_existed {
        let existing = std::fs::read_to_string(&gitignore_path).map_err(|e| InitError::IoError {
            path: gitignore_path.clone(),
            error: e.to_string(),
        })?;
        append_gitignore_entries(&existing)
    } else {
        generate_gitignore_content()
    };
    write(&gitignore_path, &gitignore)?;

    tracing::info!("Initialized project in {}", path.display());
    Ok(InitResult {
        config_path: ProjectConfig::path_in(path),
        created,
        gitignore_existed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extractor::{extract, Declaration};
    use tempfile::TempDir;

    #[test]
    fn test_generated_config_parses() {
        let content = generate_config_content("demo");
        let config = ProjectConfig::from_toml(&content).unwrap();
        assert_eq!(config.project.name, "demo");
        assert_eq!(config.build, crate::core::config::BuildConfig::default());
        assert!(content.contains('#'));
    }

    #[test]
    fn test_index_page_points_at_library_and_manifest() {
        let page = generate_index_page(&ProjectConfig::default());
        assert!(page.contains("src=\"../closure/library/closure/goog/base.js\""));
        assert!(page.contains("src=\"js_dev/deps.js\""));
        assert!(page.contains(REQUIRE_MAIN_MARKER));
    }

    #[test]
    fn test_main_script_provides_main() {
        let declarations = extract(&generate_main_script());
        assert_eq!(declarations[0], Declaration::provide("main", 1));
        assert_eq!(declarations[1], Declaration::require("goog.dom", 3));
    }

    #[test]
    fn test_append_gitignore_entries_idempotent() {
        let first = append_gitignore_entries("*.log");
        assert!(first.starts_with("*.log\n\n# nskit\n"));
        assert_eq!(append_gitignore_entries(&first), first);
    }

    #[test]
    fn test_initialize_creates_tree() {
        let dir = TempDir::new().unwrap();
        let result = initialize(dir.path()).unwrap();

        assert!(result.config_path.is_file());
        assert!(!result.gitignore_existed);
        assert_eq!(result.created.len(), 3);
        assert!(dir.path().join("development/index.html").is_file());
        assert!(dir.path().join("development/js_dev/main.js").is_file());
        let gitignore = std::fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert!(gitignore.contains("production/"));
    }

    #[test]
    fn test_initialize_reports_conflicts_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("development/js_dev")).unwrap();
        std::fs::write(dir.path().join("development/js_dev/main.js"), "mine").unwrap();

        match initialize(dir.path()).unwrap_err() {
            InitError::Conflict { names } => {
                assert_eq!(names, vec!["development/js_dev/main.js"]);
            }
            other => panic!("Expected conflict, got: {other:?}"),
        }
        assert!(!dir.path().join("nskit.toml").exists());
        assert!(!dir.path().join(".gitignore").exists());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("development/js_dev/main.js")).unwrap(),
            "mine"
        );
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = initialize(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, InitError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_derive_project_name() {
        assert_eq!(derive_project_name(Path::new("/home/user/my-site")), "my-site");
    }
}
