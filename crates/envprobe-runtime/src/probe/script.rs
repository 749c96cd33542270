//! Embedded probe templates and the ephemeral files they are written to.

use std::io::Write;
use std::path::Path;

use envprobe_core::{Framework, ProbeError};
use tempfile::{Builder, TempPath};
use tracing::{debug, warn};

/// Version of the JSON schema the templates emit.
pub const PROBE_VERSION: u32 = 1;

const SCRIPT_PREFIX: &str = "envprobe-";
const SCRIPT_SUFFIX: &str = ".py";

const TORCH_SOURCE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/scripts/torch_probe.py"
));

const TENSORFLOW_SOURCE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/scripts/tensorflow_probe.py"
));

/// A versioned probe template, compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTemplate {
    pub framework: Framework,
    pub version: u32,
    source: &'static str,
}

impl ProbeTemplate {
    pub const fn for_framework(framework: Framework) -> Self {
        let source = match framework {
            Framework::Torch => TORCH_SOURCE,
            Framework::TensorFlow => TENSORFLOW_SOURCE,
        };
        Self {
            framework,
            version: PROBE_VERSION,
            source,
        }
    }

    pub const fn source(&self) -> &'static str {
        self.source
    }
}

/// A probe template written to a uniquely named temporary file.
///
/// The file is removed when this value is dropped. [`ScriptFile::cleanup`]
/// removes it explicitly and logs a failure instead of ignoring it.
#[derive(Debug)]
pub struct ScriptFile {
    path: TempPath,
}

impl ScriptFile {
    /// Write `template` into `scratch_dir`, or the system temp dir when `None`.
    pub fn write(template: &ProbeTemplate, scratch_dir: Option<&Path>) -> Result<Self, ProbeError> {
        let mut builder = Builder::new();
        builder.prefix(SCRIPT_PREFIX).suffix(SCRIPT_SUFFIX);

        let created = match scratch_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let mut file = created.map_err(|e| ProbeError::ScriptWrite(e.to_string()))?;

        file.write_all(template.source().as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| ProbeError::ScriptWrite(format!("{}: {e}", file.path().display())))?;

        debug!(
            "Wrote {} probe v{} to {}",
            template.framework,
            template.version,
            file.path().display()
        );

        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now. Failures are logged, never returned.
    pub fn cleanup(self) {
        let shown = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            warn!(path = %shown, error = %e, "Failed to remove probe script");
        }
    }
}
