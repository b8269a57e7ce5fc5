//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Library bootstrap script location in a default project
pub const BASE_JS: &str = "closure/library/closure/goog/base.js";

/// Development manifest location in a default project
pub const DEPS_JS: &str = "development/js_dev/deps.js";

/// Stand-in compiler: concatenates its `--js` inputs into the output file,
/// writes a minimal source map when asked, and logs its arguments.
pub const FAKE_COMPILER: &str = r#"#!/bin/sh
out=""
map=""
inputs=""
: > compiler.log
while [ $# -gt 0 ]; do
  echo "$1" >> compiler.log
  case "$1" in
    --js) inputs="$inputs $2"; echo "$2" >> compiler.log; shift ;;
    --js_output_file) out="$2"; echo "$2" >> compiler.log; shift ;;
    --create_source_map) map="$2"; echo "$2" >> compiler.log; shift ;;
    --compilation_level|--source_map_format|--output_wrapper|--define|--flagfile)
      echo "$2" >> compiler.log; shift ;;
  esac
  shift
done
cat $inputs > "$out"
if [ -n "$map" ]; then
  printf '{"version":3,"sources":["development/js_dev/main.js"],"mappings":""}' > "$map"
fi
"#;

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Append to a file in the test project
    pub fn append_file(&self, name: &str, content: &str) {
        let mut existing = self.read_file(name);
        existing.push_str(content);
        self.create_file(name, &existing);
    }

    /// Run nskit with the given arguments inside the project
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_nskit"))
            .current_dir(self.path())
            .args(args)
            .output()
            .expect("Failed to execute nskit")
    }

    /// Run nskit and assert it succeeded
    pub fn run_ok(&self, args: &[&str]) -> Output {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "nskit {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    /// Place a stub library where `setup` would have cloned it
    pub fn install_fake_library(&self) {
        self.create_file(BASE_JS, "var goog = goog || {};\n");
    }

    /// Point the project at the stand-in compiler
    pub fn install_fake_compiler(&self) {
        self.create_file("fake_compiler.sh", FAKE_COMPILER);
        self.append_file(
            "nskit.toml",
            "\n[tools]\ncompiler_command = [\"sh\", \"fake_compiler.sh\"]\n",
        );
    }

    /// Point the project at a compiler that always fails
    pub fn install_failing_compiler(&self, diagnostic: &str) {
        self.append_file(
            "nskit.toml",
            &format!(
                "\n[tools]\ncompiler_command = [\"sh\", \"-c\", \"echo '{diagnostic}' >&2; exit 1\"]\n"
            ),
        );
    }

    /// Initialized project with tooling in place (stage: tools ready)
    pub fn tools_ready() -> Self {
        let project = Self::new();
        project.run_ok(&["init"]);
        project.install_fake_library();
        project
    }

    /// All files under the project, with content, in path order
    pub fn snapshot(&self) -> Vec<(String, Vec<u8>)> {
        let mut files: Vec<_> = walkdir::WalkDir::new(self.dir.path())
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let rel = e.path().strip_prefix(self.dir.path()).unwrap();
                (rel.display().to_string(), std::fs::read(e.path()).unwrap())
            })
            .collect();
        files.sort();
        files
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Stderr as text
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Stdout as text
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}
