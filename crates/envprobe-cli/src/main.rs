//! CLI entry point - the composition root.
//!
//! Wires logging, `.env` loading and settings into an `EnvProbeService`,
//! then dispatches the parsed command.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use envprobe_cli::{Cli, handlers, load_settings};
use envprobe_core::ProcessEnv;
use envprobe_runtime::EnvProbeService;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries command output only
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let mut cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command.take() else {
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let result = match load_settings(&cli, &ProcessEnv::capture()) {
        Ok(settings) => {
            let service = EnvProbeService::system(settings);
            handlers::dispatch(&service, command, cli.json).await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => {
            println!("{output}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!(exit_code = err.exit_code(), "Command failed");
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&err.to_json())?);
            } else {
                eprintln!("Error: {err}");
            }
            Ok(ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(1)))
        }
    }
}
