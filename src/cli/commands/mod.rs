//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod init;
pub mod ready;
pub mod setup;
pub mod status;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::core::config::ProjectConfig;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project in the current directory
    Init,

    /// Fetch the module library
    Setup {
        /// Fetch again even if the library is already present
        #[arg(short, long)]
        force: bool,
    },

    /// Resolve dependencies and write the development manifest (deps.js)
    Ready,

    /// Compile the production bundle
    Build {
        /// Also build the debug tree and source map
        #[arg(short, long)]
        debug: bool,

        /// Start output directories empty
        #[arg(long)]
        clean: bool,
    },

    /// Show the project stage and which bundles exist
    Status,
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> Result<()> {
        let current_dir = std::env::current_dir()?;
        match self {
            Self::Init => init::execute(&current_dir).await,
            Self::Setup { force } => setup::execute(&current_dir, force).await,
            Self::Ready => ready::execute(&current_dir).await,
            Self::Build { debug, clean } => {
                let options = build::BuildOptions { debug, clean };
                build::execute(&current_dir, options).await
            }
            Self::Status => status::execute(&current_dir).await,
        }
    }
}

/// Load the project config, or defaults when there is none yet
///
/// A missing config is reported by the stage check, not here.
pub(crate) fn load_config(project_dir: &Path) -> Result<ProjectConfig> {
    ProjectConfig::load_or_default(project_dir)
        .with_context(|| format!("Failed to load config in {}", project_dir.display()))
}
