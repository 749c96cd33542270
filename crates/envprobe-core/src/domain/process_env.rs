//! Process environment snapshots and the probe sandbox.
//!
//! The live process environment is read exactly once per top-level call
//! ([`ProcessEnv::capture`]) and then threaded explicitly through every layer.
//! [`SandboxEnv`] is derived from a snapshot and is what probe subprocesses
//! receive in place of the parent environment.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Variable prefixes removed from the sandbox.
pub const STRIPPED_PREFIXES: &[&str] = &["VIRTUAL_ENV", "PYTHONHOME"];

/// `PATH` entries containing this substring are removed from the sandbox.
pub const DEFAULT_VENV_MARKER: &str = ".venv";

/// Immutable snapshot of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnv {
    vars: BTreeMap<OsString, OsString>,
    home: Option<PathBuf>,
}

impl ProcessEnv {
    /// Snapshot the live process environment.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
            home: dirs::home_dir(),
        }
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            home: None,
        }
    }

    /// Copy with one variable set.
    #[must_use]
    pub fn with_var(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    /// Variable value if it is valid UTF-8.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OsStr::to_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// `PATH` split into its entries, in order.
    pub fn path_entries(&self) -> Vec<PathBuf> {
        self.get("PATH")
            .map(|p| std::env::split_paths(p).collect())
            .unwrap_or_default()
    }

    /// The user's home directory: `HOME`, then `USERPROFILE`, then the platform lookup
    /// recorded at capture time.
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.get("HOME")
            .or_else(|| self.get("USERPROFILE"))
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.home.clone())
    }
}

/// Filtered environment handed to probe subprocesses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SandboxEnv {
    vars: BTreeMap<OsString, OsString>,
}

impl SandboxEnv {
    /// Derive the sandbox from a snapshot.
    ///
    /// Keys starting with any of [`STRIPPED_PREFIXES`] are dropped and every
    /// `PATH` entry containing `venv_marker` is removed. An empty marker
    /// disables the `PATH` rewrite.
    pub fn build(source: &ProcessEnv, venv_marker: &str) -> Self {
        let mut vars: BTreeMap<OsString, OsString> = source
            .iter()
            .filter(|(key, _)| !is_stripped(key))
            .map(|(k, v)| (k.to_os_string(), v.to_os_string()))
            .collect();

        if !venv_marker.is_empty() {
            for (key, value) in &mut vars {
                if is_path_key(key) {
                    *value = filter_path(value, venv_marker);
                }
            }
        }

        Self { vars }
    }

    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    pub fn vars(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &OsStr> {
        self.vars.keys().map(OsString::as_os_str)
    }

    /// `PATH` entries of the sandbox.
    pub fn path_entries(&self) -> Vec<PathBuf> {
        self.get("PATH")
            .map(|p| std::env::split_paths(p).collect())
            .unwrap_or_default()
    }
}

fn is_stripped(key: &OsStr) -> bool {
    let key = key.to_string_lossy();
    STRIPPED_PREFIXES
        .iter()
        .any(|prefix| key.starts_with(prefix))
}

#[cfg(windows)]
fn is_path_key(key: &OsStr) -> bool {
    key.eq_ignore_ascii_case("PATH")
}

#[cfg(not(windows))]
fn is_path_key(key: &OsStr) -> bool {
    key == "PATH"
}

fn filter_path(value: &OsStr, venv_marker: &str) -> OsString {
    let kept = std::env::split_paths(value)
        .filter(|entry| !entry.to_string_lossy().contains(venv_marker));

    // Entries came out of split_paths, so they cannot contain the separator.
    std::env::join_paths(kept).unwrap_or_default()
}
