//! Error taxonomy shared by every envprobe operation.
//!
//! All failures are returned as values. [`ProbeError`] is the domain error;
//! [`ErrorInfo`] is its user-safe, serializable rendering.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ports::RunError;

/// Message used when an environment name contains disallowed characters.
pub const INVALID_NAME_MESSAGE: &str =
    "Invalid environment name. Use alphanumeric characters, _, -, or . only.";

/// Rejection reasons produced by input validation.
///
/// A value of this type means no subprocess was spawned for the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Environment name cannot be empty.")]
    Empty,

    #[error("{}", INVALID_NAME_MESSAGE)]
    InvalidCharacters(String),

    #[error("Invalid environment name '{0}': reserved or option-like names are not allowed.")]
    ReservedName(String),

    #[error("Invalid environment path (parent traversal is not allowed): {0}")]
    Traversal(String),

    #[error("Invalid or non-existent environment path: {0}")]
    PathNotFound(String),

    #[error("Framework not supported: {0} (expected 'torch' or 'tensorflow')")]
    UnsupportedFramework(String),

    #[error("Invalid datatype: {given}. Allowed datatypes are: {allowed}")]
    UnknownInventoryCategory { given: String, allowed: String },
}

/// Errors returned by envprobe operations.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The manager could not be located. Not a fault: the user needs to install it.
    #[error("Conda executable not found. Please ensure Conda is installed.")]
    ExecutableNotFound,

    /// Input was rejected before any subprocess was spawned.
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    /// A subprocess exited unsuccessfully.
    #[error("{message}: {stderr}")]
    SubprocessFailure {
        message: String,
        stderr: String,
        exit_code: Option<i32>,
    },

    /// A subprocess succeeded but its machine-readable output was malformed.
    #[error("{message}")]
    OutputParse { message: String, raw_output: String },

    /// A subprocess exceeded its time budget and was killed.
    #[error("Subprocess timed out after {timeout:?} and was terminated")]
    Timeout { timeout: Duration },

    /// A subprocess could not be started.
    #[error("Failed to start subprocess: {0}")]
    Spawn(String),

    /// The ephemeral probe script could not be written.
    #[error("Failed to write probe script: {0}")]
    ScriptWrite(String),
}

impl ProbeError {
    /// Build a `SubprocessFailure` from captured stderr.
    pub fn subprocess(
        message: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::SubprocessFailure {
            message: message.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// The category of this error, for callers that branch on kind.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ExecutableNotFound => ErrorCategory::ExecutableNotFound,
            Self::InvalidInput(_) => ErrorCategory::InvalidInput,
            Self::SubprocessFailure { .. } | Self::Spawn(_) => ErrorCategory::SubprocessFailure,
            Self::OutputParse { .. } => ErrorCategory::OutputParse,
            Self::Timeout { .. } => ErrorCategory::Timeout,
            Self::ScriptWrite(_) => ErrorCategory::Resource,
        }
    }

    /// Convert into the structured, serializable form.
    pub fn to_info(&self) -> ErrorInfo {
        let (raw_output, exit_code) = match self {
            Self::SubprocessFailure { exit_code, .. } => (None, *exit_code),
            Self::OutputParse { raw_output, .. } => (Some(raw_output.clone()), None),
            _ => (None, None),
        };

        ErrorInfo {
            category: self.category(),
            message: self.to_string(),
            raw_output,
            exit_code,
        }
    }
}

impl From<RunError> for ProbeError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::Timeout { timeout, .. } => Self::Timeout { timeout },
            RunError::Spawn { .. } | RunError::Io { .. } => Self::Spawn(err.to_string()),
        }
    }
}

/// Categories of envprobe errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    ExecutableNotFound,
    InvalidInput,
    SubprocessFailure,
    OutputParse,
    Timeout,
    Resource,
}

/// User-safe structured error, the failure half of a probe result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub category: ErrorCategory,
    #[serde(rename = "error")]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
    #[serde(rename = "returncode", skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_characters_message_names_allowed_classes() {
        let err = ValidationError::InvalidCharacters("a;b".to_string());
        let msg = err.to_string();
        assert!(msg.contains("alphanumeric"));
        assert!(msg.contains("_, -, or ."));
    }

    #[test]
    fn test_subprocess_failure_info_carries_exit_code() {
        let err = ProbeError::subprocess("Failed to run probe", "boom", Some(3));
        let info = err.to_info();
        assert_eq!(info.category, ErrorCategory::SubprocessFailure);
        assert_eq!(info.exit_code, Some(3));
        assert!(info.message.contains("boom"));
        assert!(info.raw_output.is_none());
    }

    #[test]
    fn test_parse_error_info_carries_raw_output() {
        let err = ProbeError::OutputParse {
            message: "Failed to parse PyTorch output".to_string(),
            raw_output: "not json".to_string(),
        };
        let json = serde_json::to_value(err.to_info()).unwrap();
        assert_eq!(json["category"], "output_parse");
        assert_eq!(json["raw_output"], "not json");
        assert!(json.get("returncode").is_none());
    }

    #[test]
    fn test_run_timeout_maps_to_timeout() {
        let err: ProbeError = RunError::Timeout {
            program: "conda".to_string(),
            timeout: Duration::from_millis(300),
        }
        .into();
        assert!(matches!(err, ProbeError::Timeout { .. }));
        assert_eq!(
            err.to_string(),
            "Subprocess timed out after 300ms and was terminated"
        );
        assert_eq!(err.category(), ErrorCategory::Timeout);
    }
}
