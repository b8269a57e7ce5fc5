//! Default configuration values

/// Project configuration file name
pub const CONFIG_FILE: &str = "nskit.toml";

/// Generated development dependency manifest, written into the `js_dev` directory
pub const DEPS_FILE: &str = "deps.js";

/// Library bootstrap script, relative to the library root
pub const BASE_JS: &str = "closure/goog/base.js";

/// Scratch directory for staged artifacts, relative to the project root
pub const STAGING_DIR: &str = ".nskit";

/// Development tree
pub const DEVELOPMENT_DIR: &str = "development";

/// Debug output tree
pub const DEBUG_DIR: &str = "debug";

/// Production output tree
pub const PRODUCTION_DIR: &str = "production";

/// Project scripts
pub const JS_DEV_DIR: &str = "development/js_dev";

/// Vendored module library
pub const LIBRARY_ROOT: &str = "closure/library";

/// Vendored compiler
pub const COMPILER_ROOT: &str = "closure/compiler";

/// HTML test runner (generated by external tooling)
pub const TESTRUNNER: &str = "development/all_tests.html";

/// Compiled bundle path, relative to the output tree
pub const COMPILED_OUTPUT_PATH: &str = "js/script.min.js";

/// Suffix identifying test scripts
pub const TEST_FILE_PATTERN: &str = "_test.js";

/// Default compilation level
pub const COMPILATION_LEVEL: &str = "ADVANCED_OPTIMIZATIONS";

/// Namespaces supplied by the vendored library
pub const DEFAULT_EXTERNS: &[&str] = &["goog.*"];

/// Compiler flag file for production builds, relative to the compiler root
pub const COMPILER_FLAGFILE: &str = "flagfile";

/// Compiler flag file for debug builds, relative to the compiler root
pub const COMPILER_FLAGFILE_DEBUG: &str = "flagfile.debug";

/// Default compiler invocation
pub const COMPILER_COMMAND: &[&str] = &["java", "-jar", "closure/compiler/compiler.jar"];
