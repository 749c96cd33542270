//! Port definitions.
//!
//! Core owns the traits; `envprobe-runtime` owns the implementations.

mod command_runner;

pub use command_runner::{CommandOutput, CommandRunner, Invocation, RunError};
