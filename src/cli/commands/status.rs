//! CLI implementation for `nskit status` command

use std::path::Path;

use anyhow::Result;

use crate::cli::commands::load_config;
use crate::cli::output::{is_json, print_detail, print_info, print_json};
use crate::core::stage::detect_status;

/// Execute the status command
pub async fn execute(project_dir: &Path) -> Result<()> {
    let config = load_config(project_dir)?;
    let status = detect_status(project_dir, &config);

    if is_json() {
        return print_json(&status);
    }

    print_info(&format!("Stage: {}", status.stage));
    let bundle = |present: bool| if present { "present" } else { "missing" };
    print_detail(&format!("Production bundle: {}", bundle(status.production_bundle)));
    print_detail(&format!("Debug bundle: {}", bundle(status.debug_bundle)));
    if let Some(next) = status.stage.next_command() {
        print_detail(&format!("Next: nskit {next}"));
    }
    Ok(())
}
