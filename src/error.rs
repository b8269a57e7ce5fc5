//! Error types for nskit
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::stage::ProjectStage;

/// Project initialization errors
#[derive(Error, Debug)]
pub enum InitError {
    /// Directory not found
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Template entries already present in the target directory
    #[error("Conflicted files: {}", names.join(", "))]
    Conflict { names: Vec<String> },

    /// IO error during initialization
    #[error("IO error for '{path}': {error}")]
    IoError { path: PathBuf, error: String },
}

/// Dependency resolution errors
///
/// All of these abort the current command before any artifact is written.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Two files provide the same symbol
    #[error("Symbol '{symbol}' is provided by both '{first}' and '{second}'")]
    DuplicateProvider {
        symbol: String,
        first: String,
        second: String,
    },

    /// A required symbol has no provider and is not an extern
    #[error("Unresolved symbol '{symbol}' required by '{file}'")]
    UnresolvedSymbol { file: String, symbol: String },

    /// The file dependency graph contains a cycle
    #[error("Cyclic dependency detected: {}", format_cycle(cycle))]
    CyclicDependency { cycle: Vec<String> },
}

fn format_cycle(cycle: &[String]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(String::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first);
    }
    parts.join(" -> ")
}

/// Lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// The project is not in the stage a command requires
    #[error("Cannot run '{command}': project must be {expected}, but it is {actual}. {hint}")]
    Precondition {
        command: String,
        expected: ProjectStage,
        actual: ProjectStage,
        hint: String,
    },
}

/// External collaborator that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    /// Library fetch (git clone)
    ToolFetch,
    /// JavaScript compiler
    Compiler,
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToolFetch => write!(f, "tool fetch"),
            Self::Compiler => write!(f, "compiler"),
        }
    }
}

/// External process failures
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The collaborator ran and reported failure; `output` is its diagnostic output verbatim
    #[error("{collaborator} failed:\n{output}")]
    Failed {
        collaborator: Collaborator,
        output: String,
    },

    /// The collaborator could not be started at all
    #[error("Failed to launch {collaborator} '{program}': {error}")]
    Launch {
        collaborator: Collaborator,
        program: String,
        error: String,
    },

    /// The collaborator was interrupted before completion
    #[error("{collaborator} was interrupted")]
    Interrupted { collaborator: Collaborator },
}

impl CollaboratorError {
    /// Which collaborator this error belongs to
    pub fn collaborator(&self) -> Collaborator {
        match self {
            Self::Failed { collaborator, .. }
            | Self::Launch { collaborator, .. }
            | Self::Interrupted { collaborator } => *collaborator,
        }
    }
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to copy a file
    #[error("Failed to copy '{from}' to '{to}': {error}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Failed to move a path into place
    #[error("Failed to rename '{from}' to '{to}': {error}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        error: String,
    },

    /// Failed to walk a directory tree
    #[error("Failed to walk '{path}': {error}")]
    Walk { path: PathBuf, error: String },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: PathBuf, error: String },
}

/// Top-level nskit error type
#[derive(Error, Debug)]
pub enum NskitError {
    /// Resolution error
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Lifecycle error
    #[error(transparent)]
    Stage(#[from] StageError),

    /// External collaborator error
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Config error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Init error
    #[error("Init error: {0}")]
    Init(#[from] InitError),

    /// Source map error
    #[error("Invalid source map '{path}': {error}")]
    SourceMap { path: PathBuf, error: String },
}
