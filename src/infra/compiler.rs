//! Compiler invocation
//!
//! Runs the external JavaScript compiler as a blocking subprocess. This is
//! the compiler collaborator used by `nskit build`.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Collaborator, CollaboratorError};
use crate::infra::interrupt;

/// One compiler run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileRequest {
    /// Input scripts in the order they must be concatenated
    pub inputs: Vec<PathBuf>,
    /// Bundle to produce
    pub output: PathBuf,
    /// Debug build (source map, `goog.DEBUG` left on)
    pub debug: bool,
    /// Source map to produce, debug builds only
    pub source_map: Option<PathBuf>,
    /// Optimization level
    pub compilation_level: String,
    /// Extra flags file forwarded to the compiler
    pub flagfile: Option<PathBuf>,
}

/// Compiler collaborator
pub trait Compiler {
    /// Compile `request`, resolving relative paths against `working_dir`
    fn compile(&self, working_dir: &Path, request: &CompileRequest) -> Result<(), CollaboratorError>;
}

/// Closure Compiler command-line wrapper
#[derive(Debug, Clone)]
pub struct ClosureCompiler {
    /// Program followed by its leading arguments
    command: Vec<String>,
    interrupt: &'static AtomicBool,
}

impl ClosureCompiler {
    /// Create a wrapper around the given command line
    pub fn new(command: Vec<String>) -> Self {
        Self::with_interrupt_flag(command, interrupt::flag())
    }

    /// Create a wrapper whose runs count as interrupted once `interrupt` is raised
    pub fn with_interrupt_flag(command: Vec<String>, interrupt: &'static AtomicBool) -> Self {
        Self { command, interrupt }
    }

    /// Arguments for a request, after the configured command
    pub fn arguments(request: &CompileRequest) -> Vec<String> {
        let mut args = vec![
            "--compilation_level".to_string(),
            request.compilation_level.clone(),
        ];

        for input in &request.inputs {
            args.push("--js".to_string());
            args.push(input.display().to_string());
        }

        args.push("--js_output_file".to_string());
        args.push(request.output.display().to_string());

        if request.debug {
            if let Some(map) = &request.source_map {
                let map_name = map
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                args.push("--create_source_map".to_string());
                args.push(map.display().to_string());
                args.push("--source_map_format".to_string());
                args.push("V3".to_string());
                args.push("--output_wrapper".to_string());
                args.push(format!("%output%\n//# sourceMappingURL={map_name}"));
            }
        } else {
            args.push("--define".to_string());
            args.push("goog.DEBUG=false".to_string());
        }

        if let Some(flagfile) = &request.flagfile {
            args.push("--flagfile".to_string());
            args.push(flagfile.display().to_string());
        }

        args
    }
}

impl Compiler for ClosureCompiler {
    fn compile(&self, working_dir: &Path, request: &CompileRequest) -> Result<(), CollaboratorError> {
        let Some((program, leading)) = self.command.split_first() else {
            return Err(CollaboratorError::Launch {
                collaborator: Collaborator::Compiler,
                program: String::new(),
                error: "compiler command is empty".to_string(),
            });
        };

        let args = Self::arguments(request);
        tracing::debug!("Running {program} with {} argument(s)", leading.len() + args.len());

        let output = Command::new(program)
            .args(leading)
            .args(&args)
            .current_dir(working_dir)
            .output()
            .map_err(|e| CollaboratorError::Launch {
                collaborator: Collaborator::Compiler,
                program: program.clone(),
                error: e.to_string(),
            })?;

        // Ctrl-C reaches the child too; whatever it produced is not trusted
        if self.interrupt.load(Ordering::Relaxed) {
            return Err(CollaboratorError::Interrupted {
                collaborator: Collaborator::Compiler,
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            let diagnostics = if stderr.trim().is_empty() {
                String::from_utf8_lossy(&output.stdout).into_owned()
            } else {
                stderr.into_owned()
            };
            return Err(CollaboratorError::Failed {
                collaborator: Collaborator::Compiler,
                output: diagnostics,
            });
        }

        if !stderr.trim().is_empty() {
            tracing::debug!("{stderr}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn request(debug: bool) -> CompileRequest {
        CompileRequest {
            inputs: vec![
                PathBuf::from("closure/library/closure/goog/base.js"),
                PathBuf::from("development/js_dev/main.js"),
            ],
            output: PathBuf::from("production/js/script.min.js"),
            debug,
            source_map: debug.then(|| PathBuf::from("debug/js/script.min.js.map")),
            compilation_level: "ADVANCED_OPTIMIZATIONS".to_string(),
            flagfile: None,
        }
    }

    #[test]
    fn test_production_arguments() {
        let args = ClosureCompiler::arguments(&request(false));
        assert_eq!(
            args,
            vec![
                "--compilation_level",
                "ADVANCED_OPTIMIZATIONS",
                "--js",
                "closure/library/closure/goog/base.js",
                "--js",
                "development/js_dev/main.js",
                "--js_output_file",
                "production/js/script.min.js",
                "--define",
                "goog.DEBUG=false",
            ]
        );
    }

    #[test]
    fn test_debug_arguments_request_source_map() {
        let mut req = request(true);
        req.flagfile = Some(PathBuf::from("closure/compiler/flagfile.debug"));
        let args = ClosureCompiler::arguments(&req);

        assert!(!args.contains(&"goog.DEBUG=false".to_string()));
        let map_pos = args.iter().position(|a| a == "--create_source_map").unwrap();
        assert_eq!(args[map_pos + 1], "debug/js/script.min.js.map");
        assert!(args.contains(&"%output%\n//# sourceMappingURL=script.min.js.map".to_string()));
        assert_eq!(args[args.len() - 2..], ["--flagfile", "closure/compiler/flagfile.debug"]);
    }

    #[test]
    fn test_missing_program_is_launch_error() {
        let dir = TempDir::new().unwrap();
        let compiler = ClosureCompiler::new(vec!["nskit-no-such-compiler".to_string()]);
        let err = compiler.compile(dir.path(), &request(false)).unwrap_err();
        assert!(matches!(err, CollaboratorError::Launch { .. }));
    }

    #[test]
    fn test_empty_command_is_launch_error() {
        let dir = TempDir::new().unwrap();
        let err = ClosureCompiler::new(Vec::new())
            .compile(dir.path(), &request(false))
            .unwrap_err();
        assert!(matches!(err, CollaboratorError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_surfaces_stderr_verbatim() {
        let dir = TempDir::new().unwrap();
        let compiler = ClosureCompiler::new(vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo 'main.js:3: ERROR - parse error' >&2; exit 2".to_string(),
        ]);
        match compiler.compile(dir.path(), &request(false)).unwrap_err() {
            CollaboratorError::Failed { output, .. } => {
                assert_eq!(output, "main.js:3: ERROR - parse error\n");
            }
            other => panic!("Expected compiler failure, got: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_after_interrupt_is_interrupted() {
        static INTERRUPTED: AtomicBool = AtomicBool::new(true);
        let dir = TempDir::new().unwrap();
        let compiler = ClosureCompiler::with_interrupt_flag(
            vec!["sh".to_string(), "-c".to_string(), "exit 0".to_string()],
            &INTERRUPTED,
        );
        match compiler.compile(dir.path(), &request(false)).unwrap_err() {
            CollaboratorError::Interrupted { collaborator } => {
                assert_eq!(collaborator, Collaborator::Compiler);
            }
            other => panic!("Expected interrupted compile, got: {other:?}"),
        }
    }
}
