//! Git operations
//!
//! Fetches the module library by cloning its repository with the gix
//! crate. This is the tool-fetch collaborator used by `nskit setup`.

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use gix::remote::fetch::Shallow;

use crate::error::{Collaborator, CollaboratorError};
use crate::infra::interrupt;

/// Result of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchedTool {
    /// Where the tool was placed
    pub path: PathBuf,
    /// Checked out commit, when it could be resolved
    pub commit_sha: Option<String>,
}

/// Tool-fetch collaborator
///
/// Given a repository URL and a destination, populate the destination or
/// fail. The destination must not exist yet.
pub trait ToolFetcher {
    /// Fetch `url` into `dest`
    fn fetch(&self, url: &str, dest: &Path) -> Result<FetchedTool, CollaboratorError>;
}

/// Shallow clone through gix
#[derive(Debug, Clone, Copy)]
pub struct GitFetcher {
    interrupt: &'static AtomicBool,
}

impl Default for GitFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl GitFetcher {
    /// Create a new git fetcher watching the process interrupt flag
    pub fn new() -> Self {
        Self::with_interrupt_flag(interrupt::flag())
    }

    /// Create a git fetcher that stops when `interrupt` is raised
    pub fn with_interrupt_flag(interrupt: &'static AtomicBool) -> Self {
        Self { interrupt }
    }

    fn failed(&self, url: &str, error: impl std::fmt::Display) -> CollaboratorError {
        if self.interrupt.load(Ordering::Relaxed) {
            return CollaboratorError::Interrupted {
                collaborator: Collaborator::ToolFetch,
            };
        }
        CollaboratorError::Failed {
            collaborator: Collaborator::ToolFetch,
            output: format!("Failed to clone '{url}': {error}"),
        }
    }
}

impl ToolFetcher for GitFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<FetchedTool, CollaboratorError> {
        tracing::info!("Cloning {url} into {}", dest.display());

        let prepare = gix::prepare_clone(url, dest).map_err(|e| self.failed(url, e))?;

        // History is not needed, only the working tree
        let mut prepare = prepare.with_shallow(Shallow::DepthAtRemote(NonZeroU32::MIN));

        let (mut checkout, _outcome) = prepare
            .fetch_then_checkout(gix::progress::Discard, self.interrupt)
            .map_err(|e| self.failed(url, e))?;

        let (repo, _outcome) = checkout
            .main_worktree(gix::progress::Discard, self.interrupt)
            .map_err(|e| self.failed(url, e))?;

        let commit_sha = repo.head_id().ok().map(|id| id.to_hex().to_string());
        if let Some(sha) = &commit_sha {
            tracing::debug!("Checked out {sha}");
        }

        Ok(FetchedTool {
            path: dest.to_path_buf(),
            commit_sha,
        })
    }
}
