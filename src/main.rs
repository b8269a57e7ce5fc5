//! nskit CLI
//!
//! Entry point for the nskit command-line application.

use anyhow::Result;
use clap::Parser;

use nskit::cli::output::{display_error, OutputConfig};
use nskit::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Flags pick the log level and format, so parse them first
    let output_config = OutputConfig::new(cli.quiet, cli.json, cli.verbose);
    output_config.init_tracing();
    output_config.apply_global();

    match cli.run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
