//! Package listing and other plain-text manager queries.

use std::sync::Arc;
use std::time::Duration;

use envprobe_core::ports::CommandRunner;
use envprobe_core::{EnvTarget, ProbeError};

use super::commands;
use crate::locator::ManagerPath;

/// Runs `list` inside one environment.
pub struct PackageLister {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl PackageLister {
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }

    /// The manager's package table for `target`, verbatim.
    pub async fn list(&self, manager: &ManagerPath, target: &EnvTarget) -> Result<String, ProbeError> {
        let invocation = commands::list_packages(manager.path(), target, self.timeout);
        let output = self.runner.run(&invocation).await?;

        if output.success() {
            Ok(output.stdout)
        } else {
            Err(ProbeError::subprocess(
                format!("Error listing packages in {target}"),
                output.stderr,
                output.exit_code,
            ))
        }
    }
}

/// `<manager> info` text.
pub async fn manager_info(
    runner: &dyn CommandRunner,
    manager: &ManagerPath,
    timeout: Duration,
) -> Result<String, ProbeError> {
    let output = runner.run(&commands::info(manager.path(), timeout)).await?;
    if output.success() {
        Ok(output.stdout)
    } else {
        Err(ProbeError::subprocess(
            "Error getting conda info",
            output.stderr,
            output.exit_code,
        ))
    }
}
