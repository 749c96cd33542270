//! Turning probe subprocess output into a report or a classified error.

use envprobe_core::{CapabilityReport, CommandOutput, Framework, ProbeError};
use tracing::{error, info};

/// The JSON payload line: the last non-empty line of stdout.
///
/// Interpreter warnings printed before the payload are skipped.
fn payload_line(stdout: &str) -> Option<&str> {
    stdout.lines().map(str::trim).rfind(|line| !line.is_empty())
}

/// Decode a probe payload.
pub fn parse_report(stdout: &str) -> Result<CapabilityReport, serde_json::Error> {
    serde_json::from_str(payload_line(stdout).unwrap_or_default())
}

/// Classify a finished probe run.
///
/// - exit 0 and a decodable payload: the report
/// - exit 0 and anything else: `OutputParse` carrying raw stdout
/// - non-zero exit or signal: `SubprocessFailure` carrying stderr and the code
pub fn classify(framework: Framework, output: CommandOutput) -> Result<CapabilityReport, ProbeError> {
    let name = framework.display_name();

    if !output.success() {
        error!(
            exit_code = ?output.exit_code,
            "Failed to check {name} accelerator availability: {}",
            output.stderr.trim()
        );
        return Err(ProbeError::subprocess(
            format!("Failed to check {name} accelerator availability"),
            output.stderr,
            output.exit_code,
        ));
    }

    match parse_report(&output.stdout) {
        Ok(report) => {
            info!(
                framework = %report.framework,
                available = report.accelerator_available,
                speedup = ?report.best_speedup(),
                "{name} accelerator check complete"
            );
            Ok(report)
        }
        Err(e) => {
            error!("Failed to parse {name} output ({e}): {}", output.stdout);
            Err(ProbeError::OutputParse {
                message: format!("Failed to parse {name} output"),
                raw_output: output.stdout,
            })
        }
    }
}
