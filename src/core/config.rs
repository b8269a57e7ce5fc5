//! Project configuration (nskit.toml) parsing
//!
//! The config file is the marker of an initialized project. Every field
//! has a default, so a file with only `[project]` is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::config::urls;
use crate::error::ConfigError;

/// The project configuration (nskit.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    /// Project metadata
    #[serde(default)]
    pub project: ProjectSection,

    /// Build configuration
    #[serde(default)]
    pub build: BuildConfig,

    /// Project layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// External tooling
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectSection {
    /// Project name
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    "unnamed".to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            name: default_name(),
        }
    }
}

/// Build options consumed by the resolver and the compiler
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildConfig {
    /// Directories scanned for scripts, relative to the project root
    #[serde(default = "default_source_roots")]
    pub source_roots: Vec<PathBuf>,

    /// Bundle path, relative to the output tree
    #[serde(default = "default_compiled_output_path")]
    pub compiled_output_path: PathBuf,

    /// Test script suffix, used by external test-runner tooling
    #[serde(default = "default_test_file_pattern")]
    pub test_file_pattern: String,

    /// Also produce the debug tree and source map
    #[serde(default, rename = "debug")]
    pub is_debug_enabled: bool,

    /// Symbols (or `prefix.*` namespaces) exempt from require validation
    #[serde(default = "default_externs")]
    pub externs: Vec<String>,

    /// Compiler optimization level
    #[serde(default = "default_compilation_level")]
    pub compilation_level: String,
}

fn default_source_roots() -> Vec<PathBuf> {
    vec![PathBuf::from(defaults::JS_DEV_DIR)]
}

fn default_compiled_output_path() -> PathBuf {
    PathBuf::from(defaults::COMPILED_OUTPUT_PATH)
}

fn default_test_file_pattern() -> String {
    defaults::TEST_FILE_PATTERN.to_string()
}

fn default_externs() -> Vec<String> {
    defaults::DEFAULT_EXTERNS
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_compilation_level() -> String {
    defaults::COMPILATION_LEVEL.to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_roots: default_source_roots(),
            compiled_output_path: default_compiled_output_path(),
            test_file_pattern: default_test_file_pattern(),
            is_debug_enabled: false,
            externs: default_externs(),
            compilation_level: default_compilation_level(),
        }
    }
}

impl BuildConfig {
    /// Check whether a symbol is covered by the externs list
    ///
    /// Entries match exactly, or as a namespace when written `prefix.*`.
    pub fn is_extern(&self, symbol: &str) -> bool {
        self.externs
            .iter()
            .filter(|entry| !is_path_entry(entry))
            .any(|entry| match entry.strip_suffix(".*") {
                Some(prefix) => symbol
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('.')),
                None => entry == symbol,
            })
    }

    /// Extern entries naming files or directories, which are never scanned
    pub fn extern_paths(&self) -> Vec<PathBuf> {
        self.externs
            .iter()
            .filter(|entry| is_path_entry(entry))
            .map(PathBuf::from)
            .collect()
    }
}

fn is_path_entry(entry: &str) -> bool {
    entry.contains('/') || entry.ends_with(".js")
}

/// Project layout, all paths relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
    #[serde(default = "default_development_dir")]
    pub development_dir: PathBuf,
    #[serde(default = "default_debug_dir")]
    pub debug_dir: PathBuf,
    #[serde(default = "default_production_dir")]
    pub production_dir: PathBuf,
    #[serde(default = "default_js_dev_dir")]
    pub js_dev_dir: PathBuf,
    #[serde(default = "default_library_root")]
    pub library_root: PathBuf,
    #[serde(default = "default_compiler_root")]
    pub compiler_root: PathBuf,
    #[serde(default = "default_testrunner")]
    pub testrunner: PathBuf,
}

fn default_development_dir() -> PathBuf {
    PathBuf::from(defaults::DEVELOPMENT_DIR)
}

fn default_debug_dir() -> PathBuf {
    PathBuf::from(defaults::DEBUG_DIR)
}

fn default_production_dir() -> PathBuf {
    PathBuf::from(defaults::PRODUCTION_DIR)
}

fn default_js_dev_dir() -> PathBuf {
    PathBuf::from(defaults::JS_DEV_DIR)
}

fn default_library_root() -> PathBuf {
    PathBuf::from(defaults::LIBRARY_ROOT)
}

fn default_compiler_root() -> PathBuf {
    PathBuf::from(defaults::COMPILER_ROOT)
}

fn default_testrunner() -> PathBuf {
    PathBuf::from(defaults::TESTRUNNER)
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            development_dir: default_development_dir(),
            debug_dir: default_debug_dir(),
            production_dir: default_production_dir(),
            js_dev_dir: default_js_dev_dir(),
            library_root: default_library_root(),
            compiler_root: default_compiler_root(),
            testrunner: default_testrunner(),
        }
    }
}

impl PathsConfig {
    /// Library bootstrap script, whose presence marks tooling as fetched
    pub fn base_js(&self) -> PathBuf {
        self.library_root.join(defaults::BASE_JS)
    }

    /// Generated development dependency manifest
    pub fn deps_js(&self) -> PathBuf {
        self.js_dev_dir.join(defaults::DEPS_FILE)
    }

    /// Compiler flag file for the given build flavor
    pub fn compiler_flagfile(&self, debug: bool) -> PathBuf {
        let name = if debug {
            defaults::COMPILER_FLAGFILE_DEBUG
        } else {
            defaults::COMPILER_FLAGFILE
        };
        self.compiler_root.join(name)
    }
}

/// External tooling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolsConfig {
    /// Repository cloned into `paths.library_root` by `setup`
    #[serde(default = "default_library_url")]
    pub library_url: String,

    /// Compiler program and leading arguments
    #[serde(default = "default_compiler_command")]
    pub compiler_command: Vec<String>,
}

fn default_library_url() -> String {
    urls::CLOSURE_LIBRARY.to_string()
}

fn default_compiler_command() -> Vec<String> {
    defaults::COMPILER_COMMAND
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            library_url: default_library_url(),
            compiler_command: default_compiler_command(),
        }
    }
}

impl ProjectConfig {
    /// Path of the config file inside a project directory
    pub fn path_in(project_dir: &Path) -> PathBuf {
        project_dir.join(defaults::CONFIG_FILE)
    }

    /// Load the config from a project directory
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let path = Self::path_in(project_dir);
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|e| ConfigError::Parse {
            path,
            error: e.to_string(),
        })
    }

    /// Load the config if present, falling back to defaults
    ///
    /// Used by stage probing, which must work on uninitialized directories.
    pub fn load_or_default(project_dir: &Path) -> Result<Self, ConfigError> {
        if Self::path_in(project_dir).exists() {
            Self::load(project_dir)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from TOML string
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize config to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
