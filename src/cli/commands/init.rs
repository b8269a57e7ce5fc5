//! CLI implementation for `nskit init` command

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{is_json, print_detail, print_json, print_success};
use crate::core::builder::BuildOrchestrator;
use crate::core::config::ProjectConfig;
use crate::core::walker::normalize;
use crate::infra::compiler::ClosureCompiler;
use crate::infra::git::GitFetcher;

/// Execute the init command
pub async fn execute(path: &Path) -> Result<()> {
    let config = ProjectConfig::default();
    let fetcher = GitFetcher::new();
    let compiler = ClosureCompiler::new(config.tools.compiler_command.clone());
    let orchestrator = BuildOrchestrator::new(path, config, &fetcher, &compiler);

    let result = orchestrator
        .init()
        .await
        .with_context(|| format!("Failed to initialize {}", path.display()))?;

    let created: Vec<String> = result.created.iter().map(|p| normalize(p)).collect();
    if is_json() {
        return print_json(&serde_json::json!({
            "stage": orchestrator.stage(),
            "created": created,
        }));
    }

    print_success(&format!("Initialized nskit project in {}", path.display()));
    for file in &created {
        print_detail(&format!("Created {file}"));
    }
    if result.gitignore_existed {
        print_detail("Updated .gitignore");
    } else {
        print_detail("Created .gitignore");
    }
    print_detail("Next: nskit setup");

    Ok(())
}
