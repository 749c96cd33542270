//! Core domain types and port definitions for envprobe.
//!
//! This crate is pure: it validates input, models environments and probe
//! reports, builds sandboxed subprocess environments and defines the
//! [`CommandRunner`](ports::CommandRunner) port. Nothing here spawns a process.

pub mod domain;
pub mod error;
pub mod ports;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    Benchmark, CapabilityReport, DEFAULT_VENV_MARKER, EnvTarget, Environment, EnvironmentListing,
    Framework, InventoryCategory, ProcessEnv, SandboxEnv, STRIPPED_PREFIXES,
};
pub use error::{ErrorCategory, ErrorInfo, ProbeError, ValidationError};
pub use ports::{CommandOutput, CommandRunner, Invocation, RunError};
pub use settings::{
    DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_MANAGER, DEFAULT_PROBE_TIMEOUT_SECS, Settings,
    SettingsError, validate_settings,
};
