//! Tokio-backed implementation of the `CommandRunner` port.
//!
//! Invocations are spawned directly from their argument vector, with stdin
//! closed and stdout/stderr captured. On Unix the child leads its own process
//! group; when the timeout elapses the whole group is killed, so grandchildren
//! (the interpreter behind `conda run`) do not outlive the call.

use std::process::Stdio;

use async_trait::async_trait;
use envprobe_core::ports::{CommandOutput, CommandRunner, Invocation, RunError};
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs invocations as real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, RunError> {
        let program = invocation.program.display().to_string();

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(unix)]
        cmd.process_group(0);

        if let Some(env) = &invocation.env {
            cmd.env_clear();
            cmd.envs(env.vars());
        }

        debug!("Executing: {}", invocation.command_line());

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RunError::Spawn {
                    program,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                return Err(RunError::Io {
                    program,
                    reason: e.to_string(),
                });
            }
        };
        let pid = child.id();

        let output = match tokio::time::timeout(invocation.timeout, child.wait_with_output()).await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(RunError::Io {
                    program,
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                if let Some(pid) = pid {
                    kill_process_group(pid);
                }
                return Err(RunError::Timeout {
                    program,
                    timeout: invocation.timeout,
                });
            }
        };

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// SIGKILL every process in the group led by `pid`.
#[cfg(unix)]
fn kill_process_group(pid: u32) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    match killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) | Err(Errno::ESRCH) => {}
        Err(e) => warn!(pid, error = %e, "Failed to kill process group"),
    }
}

// The dropped child is killed by `kill_on_drop`.
#[cfg(not(unix))]
const fn kill_process_group(_pid: u32) {}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use envprobe_core::{ProcessEnv, SandboxEnv};
    use std::time::Duration;

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let inv = Invocation::new("sh", Duration::from_secs(10))
            .args(["-c", "echo out; echo err >&2; exit 3"]);

        let output = TokioCommandRunner.run(&inv).await.unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        let inv = Invocation::new("echo", Duration::from_secs(10)).arg("a; echo injected");

        let output = TokioCommandRunner.run(&inv).await.unwrap();

        assert_eq!(output.stdout.trim(), "a; echo injected");
    }

    #[tokio::test]
    async fn test_timeout_kills_child() {
        let inv = Invocation::new("sleep", Duration::from_millis(200)).arg("30");

        let err = TokioCommandRunner.run(&inv).await.unwrap_err();

        assert!(matches!(err, RunError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_timeout_reports_configured_duration() {
        let inv = Invocation::new("sleep", Duration::from_millis(300)).arg("30");

        let err = TokioCommandRunner.run(&inv).await.unwrap_err();

        assert!(err.to_string().ends_with("timed out after 300ms"));
    }

    #[cfg(target_os = "linux")]
    fn is_running(pid: i32) -> bool {
        // A zombie has already been killed; it only awaits reaping.
        std::fs::read_to_string(format!("/proc/{pid}/stat"))
            .ok()
            .and_then(|stat| stat.rsplit_once(')').map(|(_, rest)| rest.trim_start().to_string()))
            .is_some_and(|rest| !rest.starts_with('Z'))
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_timeout_kills_grandchildren() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("sleep.pid");
        let inv = Invocation::new("/bin/sh", Duration::from_millis(500)).args([
            "-c".to_string(),
            "sleep 41 & echo $! > \"$1\"; wait".to_string(),
            "sh".to_string(),
            pid_file.display().to_string(),
        ]);

        let err = TokioCommandRunner.run(&inv).await.unwrap_err();
        assert!(matches!(err, RunError::Timeout { .. }));

        let pid: i32 = std::fs::read_to_string(&pid_file).unwrap().trim().parse().unwrap();
        let mut alive = true;
        for _ in 0..40 {
            if !is_running(pid) {
                alive = false;
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(!alive, "background sleep {pid} outlived the timeout");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let inv = Invocation::new("/nonexistent/envprobe-no-such-binary", Duration::from_secs(5));

        let err = TokioCommandRunner.run(&inv).await.unwrap_err();

        assert!(matches!(err, RunError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_sandbox_replaces_environment() {
        let source = ProcessEnv::from_pairs([
            ("PATH", "/usr/bin:/bin"),
            ("VIRTUAL_ENV", "/proj/.venv"),
            ("KEEP_ME", "1"),
        ]);
        let inv = Invocation::new("/bin/sh", Duration::from_secs(10))
            .args(["-c", "echo \"${VIRTUAL_ENV:-unset}:${KEEP_ME:-unset}\""])
            .with_env(SandboxEnv::build(&source, ".venv"));

        let output = TokioCommandRunner.run(&inv).await.unwrap();

        assert_eq!(output.stdout.trim(), "unset:1");
    }
}
