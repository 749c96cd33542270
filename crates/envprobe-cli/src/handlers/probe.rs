//! `probe` handler.

use envprobe_core::Framework;
use envprobe_runtime::EnvProbeService;
use tracing::debug;

use super::to_json;
use crate::error::CliError;
use crate::presentation::render_report;

/// Execute the probe command.
///
/// A report is printed even when the script caught an error of its own
/// (for example the framework is not installed); only a failed run of the
/// probe itself is an error.
pub async fn execute(
    service: &EnvProbeService,
    env: &str,
    framework: Framework,
    json: bool,
) -> Result<String, CliError> {
    let report = service.probe(env, framework).await?;
    debug!(
        accelerated = report.is_accelerated(),
        "Probe of {env} finished"
    );

    if json {
        return to_json(&report);
    }
    Ok(render_report(&report))
}
