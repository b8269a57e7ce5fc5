//! CLI implementation for `nskit ready` command

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::commands::load_config;
use crate::cli::output::{is_json, print_json, print_success};
use crate::core::builder::BuildOrchestrator;
use crate::infra::compiler::ClosureCompiler;
use crate::infra::git::GitFetcher;

/// Execute the ready command
pub async fn execute(project_dir: &Path) -> Result<()> {
    let config = load_config(project_dir)?;
    let fetcher = GitFetcher::new();
    let compiler = ClosureCompiler::new(config.tools.compiler_command.clone());
    let orchestrator = BuildOrchestrator::new(project_dir, config, &fetcher, &compiler);

    let outcome = orchestrator
        .ready()
        .await
        .with_context(|| "Failed to resolve dependencies")?;

    if is_json() {
        return print_json(&serde_json::json!({
            "stage": orchestrator.stage(),
            "deps": outcome.deps_path,
            "files": outcome.file_count,
        }));
    }

    print_success(&format!(
        "Wrote {} ({} file(s))",
        outcome.deps_path.display(),
        outcome.file_count
    ));
    Ok(())
}
