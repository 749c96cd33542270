//! `locate`, `info` and `envs` handlers.

use envprobe_core::{EnvironmentListing, ErrorCategory, ErrorInfo};
use envprobe_runtime::EnvProbeService;
use serde_json::json;

use super::to_json;
use crate::error::CliError;
use crate::presentation::render_locate;

/// Execute the locate command.
pub async fn locate(service: &EnvProbeService, json: bool) -> Result<String, CliError> {
    let report = service.locate().await;

    if json {
        let attempts: Vec<_> = report
            .attempts
            .iter()
            .map(|a| {
                json!({
                    "strategy": a.strategy,
                    "candidate": a.candidate,
                    "outcome": a.outcome.to_string(),
                })
            })
            .collect();
        return to_json(&json!({
            "path": report.resolved.as_ref().map(|m| m.path()),
            "strategy": report.resolved.as_ref().map(|m| m.strategy()),
            "strategies_run": report.strategies_run,
            "attempts": attempts,
        }));
    }

    let text = render_locate(&report);
    if report.resolved.is_none() {
        return Err(not_installed(text));
    }
    Ok(text)
}

/// Execute the info command.
pub async fn info(service: &EnvProbeService, json: bool) -> Result<String, CliError> {
    let text = service.manager_info().await?;
    if json {
        return to_json(&json!({ "info": text }));
    }
    Ok(text.trim_end().to_string())
}

/// Execute the envs command.
///
/// A missing manager prints the troubleshooting diagnostic and fails with
/// the not-installed exit code.
pub async fn envs(service: &EnvProbeService, json: bool) -> Result<String, CliError> {
    let listing = service.list_environments().await?;

    if let EnvironmentListing::ManagerNotFound { diagnostic } = listing {
        return Err(not_installed(diagnostic));
    }

    if json {
        return to_json(&listing);
    }
    Ok(listing.to_string().trim_end().to_string())
}

fn not_installed(message: String) -> CliError {
    CliError::Probe(ErrorInfo {
        category: ErrorCategory::ExecutableNotFound,
        message,
        raw_output: None,
        exit_code: None,
    })
}
