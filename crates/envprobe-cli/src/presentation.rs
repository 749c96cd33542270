//! Text rendering for terminal output.

use std::fmt::Write as _;

use envprobe_core::CapabilityReport;
use envprobe_runtime::LocateReport;

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}

/// Human-readable capability report.
pub fn render_report(report: &CapabilityReport) -> String {
    let mut out = String::new();

    let version = report.framework_version.as_deref().unwrap_or("not installed");
    let python = report.python_version.as_deref().unwrap_or("?");
    let _ = writeln!(
        out,
        "{} {version} (Python {python})",
        report.framework.display_name()
    );
    if let Some(platform) = &report.platform {
        let arch = report.architecture.as_deref().unwrap_or("?");
        let _ = writeln!(out, "Platform: {platform} [{arch}]");
    }

    let devices = if report.accelerator_devices.is_empty() {
        String::new()
    } else {
        format!(" ({})", report.accelerator_devices.join(", "))
    };
    let _ = writeln!(
        out,
        "Accelerator available: {}{devices}",
        yes_no(Some(report.accelerator_available))
    );
    let _ = writeln!(out, "Built with accelerator support: {}", yes_no(report.accelerator_built));
    if report.accelerator_available {
        let _ = writeln!(out, "Functional check: {}", yes_no(report.accelerator_functional));
    }
    if let Some(reason) = &report.unavailable_reason {
        let _ = writeln!(out, "Reason: {reason}");
    }

    for b in &report.benchmarks {
        let _ = writeln!(
            out,
            "Benchmark {n}x{n} matmul: CPU {:.3}s, accelerator {:.3}s, speedup {:.2}x",
            b.cpu_time_seconds,
            b.accelerator_time_seconds,
            b.speedup_ratio,
            n = b.matrix_size
        );
    }

    if let Some(error) = &report.error {
        let _ = writeln!(out, "Probe error: {error}");
    }

    out.trim_end().to_string()
}

/// Where the manager was found, or every candidate that was checked.
pub fn render_locate(report: &LocateReport) -> String {
    match &report.resolved {
        Some(found) => format!(
            "{} (found via {})",
            found.path().display(),
            found.strategy()
        ),
        None => format!(
            "Manager not found. Strategies run: {}\n{}",
            report.strategies_run.join(", "),
            report.describe_attempts()
        ),
    }
}
