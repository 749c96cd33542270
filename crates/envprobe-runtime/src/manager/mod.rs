//! Queries against a located manager executable.
//!
//! - `commands`: argv builders for every subcommand
//! - `environments`: `env list` with JSON-first decoding and a text fallback
//! - `packages`: `list` inside one environment, and `info`

pub mod commands;
mod environments;
mod packages;

pub use environments::{EnvironmentEnumerator, not_found_diagnostic, parse_env_list_json};
pub use packages::{PackageLister, manager_info};
