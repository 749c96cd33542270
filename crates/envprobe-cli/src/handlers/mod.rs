//! Command handlers that delegate to `EnvProbeService`.
//!
//! Handlers follow one pattern:
//! - Signature: `pub async fn execute(service: &EnvProbeService, ..., json: bool) -> Result<String, CliError>`
//! - Call the service, then format its result for the terminal
//! - Return the text to print; `main` owns stdout and the exit code

pub mod discovery;
pub mod inventory;
pub mod packages;
pub mod probe;
pub mod summary;

use envprobe_runtime::EnvProbeService;
use serde::Serialize;

use crate::commands::Commands;
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(
    service: &EnvProbeService,
    command: Commands,
    json: bool,
) -> Result<String, CliError> {
    match command {
        Commands::Locate => discovery::locate(service, json).await,
        Commands::Info => discovery::info(service, json).await,
        Commands::Envs => discovery::envs(service, json).await,
        Commands::Packages { env } => packages::execute(service, &env, json).await,
        Commands::Probe { env, framework } => probe::execute(service, &env, framework, json).await,
        Commands::Summary { env } => summary::execute(service, env.as_deref(), json).await,
        Commands::Inventory { category, list } => {
            inventory::execute(service, category.as_deref(), list, json).await
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}
