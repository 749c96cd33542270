//! Command runner port.
//!
//! Every subprocess envprobe starts goes through this trait as an explicit
//! program + argument vector. No shell ever interprets caller input.
//!
//! # Design Notes
//!
//! - Core owns the trait and invocation types (pure)
//! - Runtime owns the tokio implementation
//! - Tests inject recording stubs to count and inspect invocations

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::SandboxEnv;

/// A single subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to execute (absolute path or a bare name resolved via `PATH`).
    pub program: PathBuf,
    /// Arguments, passed verbatim.
    pub args: Vec<OsString>,
    /// Replacement environment. `None` inherits the parent environment.
    pub env: Option<SandboxEnv>,
    /// Upper bound on the run time; the child is killed when it elapses.
    pub timeout: Duration,
}

impl Invocation {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: None,
            timeout,
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Run with a cleared environment replaced by `env`.
    #[must_use]
    pub fn with_env(mut self, env: SandboxEnv) -> Self {
        self.env = Some(env);
        self
    }

    /// Arguments as lossy strings, handy for assertions and logs.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Human-readable command line. For logging only, never executed.
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr.
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }
}

/// Failures to run a subprocess at all (as opposed to a non-zero exit).
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("I/O error while running {program}: {reason}")]
    Io { program: String, reason: String },
}

/// Port for running subprocesses.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the invocation to completion and capture its output.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, RunError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_argument_boundaries() {
        let inv = Invocation::new("/opt/conda/bin/conda", Duration::from_secs(5))
            .args(["list", "--name"])
            .arg("my env; rm -rf /");

        assert_eq!(inv.args.len(), 3);
        assert_eq!(inv.args_lossy()[2], "my env; rm -rf /");
        assert!(inv.env.is_none());
    }

    #[test]
    fn test_command_line_is_space_joined() {
        let inv = Invocation::new("conda", Duration::from_secs(1)).args(["env", "list"]);
        assert_eq!(inv.command_line(), "conda env list");
    }

    #[test]
    fn test_output_success() {
        assert!(CommandOutput::ok("x").success());
        assert!(!CommandOutput::failed(1, "nope").success());
        assert!(
            !CommandOutput {
                exit_code: None,
                ..CommandOutput::default()
            }
            .success()
        );
    }
}
