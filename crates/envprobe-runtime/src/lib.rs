//! Runtime adapters for envprobe.
//!
//! This crate spawns processes and touches the filesystem: the tokio
//! [`CommandRunner`](envprobe_core::ports::CommandRunner) implementation,
//! manager discovery, environment and package queries, sandboxed accelerator
//! probes and the [`EnvProbeService`] facade that composes them.

#![deny(unsafe_code)]

mod command;
pub mod inventory;
pub mod locator;
pub mod manager;
pub mod probe;
mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export the production CommandRunner implementation
pub use command::TokioCommandRunner;

// Re-export the service facade
pub use service::EnvProbeService;

pub use locator::{ExecutableLocator, LocateReport, ManagerPath, SystemFs};
pub use probe::{CapabilityProbeRunner, ProbeTemplate};
