//! Build command implementation
//!
//! Implements `nskit build`: re-resolves the sources and compiles the
//! production bundle, plus the debug tree when enabled.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::commands::load_config;
use crate::cli::output::{create_spinner, is_json, print_detail, print_json, print_success};
use crate::core::builder::{self, BuildOrchestrator};
use crate::infra::compiler::ClosureCompiler;
use crate::infra::git::GitFetcher;
use crate::infra::interrupt::InterruptGuard;

/// Build options
pub struct BuildOptions {
    /// Force a debug build for this run
    pub debug: bool,
    /// Start output directories empty
    pub clean: bool,
}

/// Execute the build command
pub async fn execute(project_dir: &Path, options: BuildOptions) -> Result<()> {
    let config = load_config(project_dir)?;
    tracing::info!("Building project: {}", config.project.name);

    let fetcher = GitFetcher::new();
    let compiler = ClosureCompiler::new(config.tools.compiler_command.clone());
    let orchestrator = BuildOrchestrator::new(project_dir, config, &fetcher, &compiler);

    let _interrupt = InterruptGuard::install();
    let spinner = create_spinner("Compiling");
    let outcome = orchestrator
        .build(builder::BuildOptions {
            debug: options.debug,
            clean: options.clean,
        })
        .await;
    spinner.finish_and_clear();
    let outcome = outcome.with_context(|| "Build failed")?;

    if is_json() {
        return print_json(&serde_json::json!({
            "production": outcome.production_bundle,
            "debug": outcome.debug.as_ref().map(|(bundle, _)| bundle),
            "source_map": outcome.debug.as_ref().map(|(_, map)| map),
            "files": outcome.file_count,
        }));
    }

    print_success(&format!(
        "Built {} from {} file(s)",
        outcome.production_bundle.display(),
        outcome.file_count
    ));
    if let Some((bundle, map)) = &outcome.debug {
        print_detail(&format!("Debug bundle: {}", bundle.display()));
        print_detail(&format!("Source map: {}", map.display()));
    }
    Ok(())
}
