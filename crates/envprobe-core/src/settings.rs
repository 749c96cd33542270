//! Settings domain types and validation.
//!
//! Settings are read from `ENVPROBE_*` variables of a [`ProcessEnv`] snapshot.
//! All fields are optional; `effective_*` accessors apply the defaults.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::{DEFAULT_VENV_MARKER, EnvTarget, ProcessEnv};

/// Default manager executable name.
pub const DEFAULT_MANAGER: &str = "conda";

/// Default Homebrew formula queried for the manager's prefix.
pub const DEFAULT_BREW_FORMULA: &str = "conda";

/// Default interpreter launched inside the environment.
pub const DEFAULT_INTERPRETER: &str = "python";

/// Default bound for manager queries (`info`, `env list`, `list`).
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 60;

/// Default bound for accelerator probes. Framework import plus a CPU matmul
/// of the benchmark size can take minutes on slow machines.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 600;

const MAX_TIMEOUT_SECS: u64 = 86_400;

/// envprobe settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Manager executable name (`conda`, `mamba`, ...).
    pub manager: Option<String>,

    /// Directory-name fragment used when scanning the home directory.
    /// Defaults to the manager name.
    pub family: Option<String>,

    /// Homebrew formula whose prefix may contain the manager.
    pub brew_formula: Option<String>,

    /// Interpreter executed by `<manager> run`.
    pub interpreter: Option<String>,

    /// `PATH` entries containing this marker are dropped from the probe sandbox.
    pub venv_marker: Option<String>,

    /// Timeout in seconds for manager queries.
    pub command_timeout_secs: Option<u64>,

    /// Timeout in seconds for probe subprocesses.
    pub probe_timeout_secs: Option<u64>,

    /// Directory for ephemeral probe scripts (system temp dir when unset).
    pub scratch_dir: Option<PathBuf>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            manager: Some(DEFAULT_MANAGER.to_string()),
            family: None,
            brew_formula: Some(DEFAULT_BREW_FORMULA.to_string()),
            interpreter: Some(DEFAULT_INTERPRETER.to_string()),
            venv_marker: Some(DEFAULT_VENV_MARKER.to_string()),
            command_timeout_secs: Some(DEFAULT_COMMAND_TIMEOUT_SECS),
            probe_timeout_secs: Some(DEFAULT_PROBE_TIMEOUT_SECS),
            scratch_dir: None,
        }
    }

    /// Read settings from `ENVPROBE_*` variables, validating the result.
    pub fn from_env(env: &ProcessEnv) -> Result<Self, SettingsError> {
        let text = |key: &str| {
            env.get_str(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };
        let secs = |key: &'static str| -> Result<Option<u64>, SettingsError> {
            text(key)
                .map(|v| {
                    v.parse::<u64>().map_err(|_| SettingsError::NotANumber {
                        key,
                        value: v.clone(),
                    })
                })
                .transpose()
        };

        let settings = Self {
            manager: text("ENVPROBE_MANAGER"),
            family: text("ENVPROBE_FAMILY"),
            brew_formula: text("ENVPROBE_BREW_FORMULA"),
            interpreter: text("ENVPROBE_INTERPRETER"),
            venv_marker: env
                .get_str("ENVPROBE_VENV_MARKER")
                .map(String::from),
            command_timeout_secs: secs("ENVPROBE_COMMAND_TIMEOUT_SECS")?,
            probe_timeout_secs: secs("ENVPROBE_PROBE_TIMEOUT_SECS")?,
            scratch_dir: text("ENVPROBE_SCRATCH_DIR").map(PathBuf::from),
        };

        validate_settings(&settings)?;
        Ok(settings)
    }

    pub fn effective_manager(&self) -> &str {
        self.manager.as_deref().unwrap_or(DEFAULT_MANAGER)
    }

    pub fn effective_family(&self) -> &str {
        self.family
            .as_deref()
            .unwrap_or_else(|| self.effective_manager())
    }

    pub fn effective_brew_formula(&self) -> &str {
        self.brew_formula
            .as_deref()
            .unwrap_or_else(|| self.effective_manager())
    }

    pub fn effective_interpreter(&self) -> &str {
        self.interpreter.as_deref().unwrap_or(DEFAULT_INTERPRETER)
    }

    pub fn effective_venv_marker(&self) -> &str {
        self.venv_marker.as_deref().unwrap_or(DEFAULT_VENV_MARKER)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(
            self.command_timeout_secs
                .unwrap_or(DEFAULT_COMMAND_TIMEOUT_SECS),
        )
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs.unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS))
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("{key} must be a whole number of seconds, got '{value}'")]
    NotANumber { key: &'static str, value: String },

    #[error("{field} must be between 1 and 86400 seconds, got {value}")]
    InvalidTimeout { field: &'static str, value: u64 },

    #[error("{field} must be a plain executable or formula name, got '{value}'")]
    InvalidName { field: &'static str, value: String },
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    for (field, value) in [
        ("command_timeout_secs", settings.command_timeout_secs),
        ("probe_timeout_secs", settings.probe_timeout_secs),
    ] {
        if let Some(value) = value
            && !(1..=MAX_TIMEOUT_SECS).contains(&value)
        {
            return Err(SettingsError::InvalidTimeout { field, value });
        }
    }

    // These names end up as argv entries and in shell-free lookups; hold them
    // to the same grammar as environment names.
    for (field, value) in [
        ("manager", &settings.manager),
        ("family", &settings.family),
        ("brew_formula", &settings.brew_formula),
        ("interpreter", &settings.interpreter),
    ] {
        if let Some(value) = value
            && !matches!(EnvTarget::parse(value), Ok(EnvTarget::Name(_)))
        {
            return Err(SettingsError::InvalidName {
                field,
                value: value.clone(),
            });
        }
    }

    Ok(())
}
