//! `summary` handler.

use envprobe_runtime::EnvProbeService;
use serde_json::json;

use super::to_json;
use crate::error::CliError;

/// Execute the summary command. Section failures are rendered in place.
pub async fn execute(
    service: &EnvProbeService,
    env: Option<&str>,
    json: bool,
) -> Result<String, CliError> {
    let text = service.summary(env).await;
    if json {
        return to_json(&json!({ "summary": text }));
    }
    Ok(text.trim_end().to_string())
}
