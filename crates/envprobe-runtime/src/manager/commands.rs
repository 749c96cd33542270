//! Argument vectors for every manager subcommand envprobe runs.
//!
//! Builders are pure: they never spawn and never consult the filesystem.
//! Environment selectors only arrive as [`EnvTarget`], so every value here has
//! already passed validation.

use std::path::Path;
use std::time::Duration;

use envprobe_core::ports::Invocation;
use envprobe_core::{EnvTarget, InventoryCategory};

const NATIVE_INVENTORY: &str = "system_profiler";

/// `<manager> info`
pub fn info(manager: &Path, timeout: Duration) -> Invocation {
    Invocation::new(manager, timeout).arg("info")
}

/// `<manager> env list --json`
pub fn env_list_json(manager: &Path, timeout: Duration) -> Invocation {
    Invocation::new(manager, timeout).args(["env", "list", "--json"])
}

/// `<manager> env list`
pub fn env_list(manager: &Path, timeout: Duration) -> Invocation {
    Invocation::new(manager, timeout).args(["env", "list"])
}

/// `<manager> list --prefix <path>` or `<manager> list --name <name>`
pub fn list_packages(manager: &Path, target: &EnvTarget, timeout: Duration) -> Invocation {
    let selector = if target.is_prefix() { "--prefix" } else { "--name" };
    Invocation::new(manager, timeout)
        .arg("list")
        .arg(selector)
        .arg(target.as_os_str())
}

/// `<manager> run -n <name> <interpreter> <script>` (`-p` for a prefix).
pub fn run_script(
    manager: &Path,
    target: &EnvTarget,
    interpreter: &str,
    script: &Path,
    timeout: Duration,
) -> Invocation {
    let selector = if target.is_prefix() { "-p" } else { "-n" };
    Invocation::new(manager, timeout)
        .args(["run", selector])
        .arg(target.as_os_str())
        .arg(interpreter)
        .arg(script)
}

/// `system_profiler <category>`
pub fn inventory(category: InventoryCategory, timeout: Duration) -> Invocation {
    Invocation::new(NATIVE_INVENTORY, timeout).arg(category.as_str())
}
