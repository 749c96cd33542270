//! Environment enumeration.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use envprobe_core::ports::CommandRunner;
use envprobe_core::{Environment, EnvironmentListing, ProbeError, ProcessEnv};
use serde::Deserialize;
use sysinfo::System;
use tracing::{debug, warn};

use super::commands;
use crate::locator::ManagerPath;

/// Payload of `env list --json`.
#[derive(Debug, Deserialize)]
struct EnvListPayload {
    #[serde(default)]
    envs: Vec<String>,
}

/// Decode `env list --json` output, preserving order and dropping repeated paths.
pub fn parse_env_list_json(stdout: &str) -> Result<Vec<Environment>, serde_json::Error> {
    let payload: EnvListPayload = serde_json::from_str(stdout)?;

    let mut seen = HashSet::new();
    let prefixes = payload
        .envs
        .into_iter()
        .filter(|path| seen.insert(path.clone()))
        .map(PathBuf::from)
        .collect();

    Ok(Environment::from_prefixes(prefixes))
}

/// Lists the environments a located manager knows about.
pub struct EnvironmentEnumerator {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl EnvironmentEnumerator {
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    /// JSON listing first; the human-readable listing when that is unusable.
    pub async fn list(&self, manager: &ManagerPath) -> Result<EnvironmentListing, ProbeError> {
        let invocation = commands::env_list_json(manager.path(), self.timeout);
        match self.runner.run(&invocation).await {
            Ok(output) if output.success() && !output.stdout.trim().is_empty() => {
                match parse_env_list_json(&output.stdout) {
                    Ok(environments) => {
                        return Ok(EnvironmentListing::Parsed {
                            manager: manager.path().to_path_buf(),
                            environments,
                        });
                    }
                    Err(e) => debug!("env list --json was not decodable: {e}"),
                }
            }
            Ok(output) => debug!(
                "env list --json exited with {:?}, falling back to text",
                output.exit_code
            ),
            Err(e) => warn!(error = %e, "env list --json could not run, falling back to text"),
        }

        let invocation = commands::env_list(manager.path(), self.timeout);
        let output = self.runner.run(&invocation).await?;
        if !output.success() {
            return Err(ProbeError::subprocess(
                "Error listing conda environments",
                output.stderr,
                output.exit_code,
            ));
        }

        Ok(EnvironmentListing::Raw {
            manager: manager.path().to_path_buf(),
            text: output.stdout,
        })
    }
}

/// Troubleshooting text for a host where no manager could be found.
pub fn not_found_diagnostic(env: &ProcessEnv) -> String {
    let os_name = System::name().unwrap_or_else(|| std::env::consts::OS.to_string());
    let release = System::kernel_version().unwrap_or_default();

    let mut text = String::from("Conda executable not found. Please ensure Conda is installed.\n");
    let _ = writeln!(
        text,
        "System: {os_name} {release} ({})",
        std::env::consts::ARCH
    );
    let _ = writeln!(
        text,
        "Platform: {}-{} ({})",
        std::env::consts::ARCH,
        std::env::consts::OS,
        std::env::consts::FAMILY
    );
    if let Some(long) = System::long_os_version() {
        let _ = writeln!(text, "OS version: {long}");
    }

    text.push_str("\nPATH directories:");
    for entry in env.path_entries() {
        let _ = write!(text, "\n- {}", entry.display());
    }
    text
}
