//! CLI-specific error types and mappings.
//!
//! Maps [`ProbeError`] and [`SettingsError`] to exit codes and user-facing
//! messages.

use envprobe_core::{ErrorCategory, ErrorInfo, ProbeError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A failure reported by an envprobe operation.
    #[error("{}", .0.message)]
    Probe(ErrorInfo),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Probe(info) => match info.category {
                ErrorCategory::InvalidInput => 64,       // EX_USAGE
                ErrorCategory::OutputParse => 65,        // EX_DATAERR
                ErrorCategory::ExecutableNotFound => 69, // EX_UNAVAILABLE
                ErrorCategory::SubprocessFailure => 70,  // EX_SOFTWARE
                ErrorCategory::Resource => 73,           // EX_CANTCREAT
                ErrorCategory::Timeout => 75,            // EX_TEMPFAIL
            },
            Self::Output(_) => 74, // EX_IOERR
            Self::Config(_) => 78, // EX_CONFIG
        }
    }

    /// Structured form for `--json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Probe(info) => serde_json::to_value(info).unwrap_or_else(|_| {
                serde_json::json!({ "error": info.message })
            }),
            other => serde_json::json!({ "error": other.to_string() }),
        }
    }
}

impl From<ProbeError> for CliError {
    fn from(err: ProbeError) -> Self {
        Self::Probe(err.to_info())
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use envprobe_core::ValidationError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::from(ProbeError::ExecutableNotFound).exit_code(), 69);
        assert_eq!(
            CliError::from(ProbeError::from(ValidationError::Empty)).exit_code(),
            64
        );
        let timeout = std::time::Duration::from_secs(600);
        assert_eq!(CliError::from(ProbeError::Timeout { timeout }).exit_code(), 75);
        assert_eq!(CliError::Config("bad".into()).exit_code(), 78);
    }

    #[test]
    fn test_json_keeps_original_keys() {
        let err = CliError::from(ProbeError::subprocess("Failed", "boom", Some(2)));
        let json = err.to_json();

        assert_eq!(json["error"], "Failed: boom");
        assert_eq!(json["returncode"], 2);
        assert_eq!(json["category"], "subprocess_failure");
    }
}
