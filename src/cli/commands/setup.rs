//! CLI implementation for `nskit setup` command

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::commands::load_config;
use crate::cli::output::{create_spinner, is_json, print_detail, print_info, print_json, print_success};
use crate::core::builder::{BuildOrchestrator, SetupOutcome};
use crate::infra::compiler::ClosureCompiler;
use crate::infra::git::GitFetcher;
use crate::infra::interrupt::InterruptGuard;

/// Execute the setup command
pub async fn execute(project_dir: &Path, force: bool) -> Result<()> {
    let config = load_config(project_dir)?;
    let url = config.tools.library_url.clone();
    let fetcher = GitFetcher::new();
    let compiler = ClosureCompiler::new(config.tools.compiler_command.clone());
    let orchestrator = BuildOrchestrator::new(project_dir, config, &fetcher, &compiler);

    let _interrupt = InterruptGuard::install();
    let spinner = create_spinner(&format!("Fetching {url}"));
    let outcome = orchestrator.setup(force).await;
    spinner.finish_and_clear();
    let outcome = outcome.with_context(|| "Failed to set up tooling")?;

    if is_json() {
        let commit = match &outcome {
            SetupOutcome::Fetched(tool) => tool.commit_sha.clone(),
            SetupOutcome::AlreadyPresent => None,
        };
        return print_json(&serde_json::json!({
            "stage": orchestrator.stage(),
            "fetched": matches!(outcome, SetupOutcome::Fetched(_)),
            "commit": commit,
        }));
    }

    match outcome {
        SetupOutcome::Fetched(tool) => {
            print_success(&format!("Fetched library into {}", tool.path.display()));
            if let Some(sha) = tool.commit_sha {
                print_detail(&format!("Commit {sha}"));
            }
        }
        SetupOutcome::AlreadyPresent => {
            print_info("Library already present (use --force to fetch again)");
        }
    }
    Ok(())
}
