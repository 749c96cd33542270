//! Native system inventory pass-through (`system_profiler`).

use std::time::Duration;

use envprobe_core::ports::CommandRunner;
use envprobe_core::{InventoryCategory, ProbeError};

use crate::manager::commands;

/// Report for one allow-listed category.
pub async fn run_inventory(
    runner: &dyn CommandRunner,
    category: InventoryCategory,
    timeout: Duration,
) -> Result<String, ProbeError> {
    let output = runner.run(&commands::inventory(category, timeout)).await?;
    if output.success() {
        Ok(output.stdout)
    } else {
        Err(ProbeError::subprocess(
            format!("Error running system_profiler {category}"),
            output.stderr,
            output.exit_code,
        ))
    }
}
