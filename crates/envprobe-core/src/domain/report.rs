//! Capability reports emitted by the probe scripts.
//!
//! The JSON schema is shared by every probe template:
//!
//! ```json
//! {"probe_version": 1, "framework": "torch", "framework_version": "2.3.0",
//!  "accelerator_available": true, "accelerator_built": true,
//!  "accelerator_functional": true,
//!  "benchmarks": [{"matrix_size": 5000, "cpu_time_seconds": 1.2,
//!                  "accelerator_time_seconds": 0.1, "speedup_ratio": 12.0}]}
//! ```

use serde::{Deserialize, Serialize};

use super::Framework;

/// One CPU vs accelerator matrix-multiply timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benchmark {
    pub matrix_size: u32,
    pub cpu_time_seconds: f64,
    pub accelerator_time_seconds: f64,
    /// `cpu_time_seconds / accelerator_time_seconds`, or 0 when the latter is 0.
    pub speedup_ratio: f64,
}

/// Structured capability record for one framework inside one environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityReport {
    #[serde(default)]
    pub probe_version: u32,
    pub framework: Framework,
    pub framework_version: Option<String>,
    pub python_version: Option<String>,
    pub platform: Option<String>,
    pub processor: Option<String>,
    pub architecture: Option<String>,
    pub accelerator_available: bool,
    /// Whether the framework build includes accelerator support, when it reports it.
    pub accelerator_built: Option<bool>,
    /// Result of the elementwise correctness check on the accelerator.
    pub accelerator_functional: Option<bool>,
    #[serde(default)]
    pub accelerator_devices: Vec<String>,
    pub unavailable_reason: Option<String>,
    /// Error caught inside the probe script itself.
    pub error: Option<String>,
    #[serde(default)]
    pub benchmarks: Vec<Benchmark>,
}

impl CapabilityReport {
    /// Highest speedup across all benchmarks.
    pub fn best_speedup(&self) -> Option<f64> {
        self.benchmarks
            .iter()
            .map(|b| b.speedup_ratio)
            .reduce(f64::max)
    }

    /// Accelerator present, functional, and faster than the CPU.
    pub fn is_accelerated(&self) -> bool {
        self.accelerator_available
            && self.accelerator_functional.unwrap_or(false)
            && self.best_speedup().is_some_and(|s| s > 1.0)
    }
}
