//! apphub - catalog tooling CLI

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use apphub_cli::cmd;
use apphub_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the status line.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match &cli.command {
        Commands::Validate { command } => {
            cmd::validate::validate(&cli.root, config, command.as_ref()).await
        }
        Commands::Pack { out, no_compress } => {
            cmd::pack::pack(&cli.root, config, out.as_deref(), *no_compress).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
