//! `packages` handler.

use envprobe_runtime::EnvProbeService;
use serde_json::json;

use super::to_json;
use crate::error::CliError;

/// Execute the packages command.
pub async fn execute(service: &EnvProbeService, env: &str, json: bool) -> Result<String, CliError> {
    let table = service.list_packages(env).await?;
    if json {
        return to_json(&json!({ "env": env, "packages": table }));
    }
    Ok(table.trim_end().to_string())
}
