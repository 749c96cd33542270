//! Sandboxed accelerator probes.
//!
//! A probe writes an embedded template to a temporary `.py` file, runs it with
//! the environment's interpreter through `<manager> run`, and classifies the
//! result. The subprocess gets a cleared environment replaced by a
//! [`SandboxEnv`] built from the caller's snapshot, and the script file is
//! removed on every exit path, including cancellation.

mod parse;
mod script;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use envprobe_core::ports::CommandRunner;
use envprobe_core::{
    CapabilityReport, EnvTarget, Framework, ProbeError, ProcessEnv, SandboxEnv, Settings,
};
use tracing::debug;

use crate::locator::ManagerPath;
use crate::manager::commands;

pub use parse::{classify, parse_report};
pub use script::{PROBE_VERSION, ProbeTemplate, ScriptFile};

/// Runs probe templates inside environments of a located manager.
pub struct CapabilityProbeRunner {
    runner: Arc<dyn CommandRunner>,
    interpreter: String,
    venv_marker: String,
    scratch_dir: Option<PathBuf>,
    timeout: Duration,
}

impl CapabilityProbeRunner {
    pub fn new(runner: Arc<dyn CommandRunner>, settings: &Settings) -> Self {
        Self {
            runner,
            interpreter: settings.effective_interpreter().to_string(),
            venv_marker: settings.effective_venv_marker().to_string(),
            scratch_dir: settings.scratch_dir.clone(),
            timeout: settings.probe_timeout(),
        }
    }

    /// Probe `framework` inside `target`.
    ///
    /// `env` is the snapshot the sandbox is derived from; it is never written
    /// back to the current process.
    pub async fn probe(
        &self,
        manager: &ManagerPath,
        target: &EnvTarget,
        framework: Framework,
        env: &ProcessEnv,
    ) -> Result<CapabilityReport, ProbeError> {
        let template = ProbeTemplate::for_framework(framework);
        let script = ScriptFile::write(&template, self.scratch_dir.as_deref())?;

        let result = self
            .execute(manager, target, framework, script.path(), env)
            .await;

        script.cleanup();
        result
    }

    async fn execute(
        &self,
        manager: &ManagerPath,
        target: &EnvTarget,
        framework: Framework,
        script: &Path,
        env: &ProcessEnv,
    ) -> Result<CapabilityReport, ProbeError> {
        let sandbox = SandboxEnv::build(env, &self.venv_marker);
        let invocation = commands::run_script(
            manager.path(),
            target,
            &self.interpreter,
            script,
            self.timeout,
        )
        .with_env(sandbox);

        debug!("Executing: {}", invocation.command_line());
        let output = self.runner.run(&invocation).await?;
        classify(framework, output)
    }
}
