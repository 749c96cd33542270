//! envprobe command-line interface.
//!
//! `main` is the composition root; everything testable lives here.

#![deny(unsafe_code)]

pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

use envprobe_core::{ProcessEnv, Settings, validate_settings};

// Re-export primary types for convenient access
pub use commands::Commands;
pub use error::CliError;
pub use parser::Cli;

/// Settings from `ENVPROBE_*` variables, with command-line overrides applied.
pub fn load_settings(cli: &Cli, env: &ProcessEnv) -> Result<Settings, CliError> {
    let mut settings = Settings::from_env(env)?;
    if let Some(manager) = &cli.manager {
        settings.manager = Some(manager.clone());
        validate_settings(&settings)?;
    }
    Ok(settings)
}
