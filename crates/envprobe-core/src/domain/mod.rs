//! Domain types.

mod environment;
mod framework;
mod inventory;
mod process_env;
mod report;
mod target;

pub use environment::{Environment, EnvironmentListing};
pub use framework::Framework;
pub use inventory::InventoryCategory;
pub use process_env::{DEFAULT_VENV_MARKER, ProcessEnv, STRIPPED_PREFIXES, SandboxEnv};
pub use report::{Benchmark, CapabilityReport};
pub use target::EnvTarget;
