//! Types for manager executable discovery.

use std::fmt;
use std::path::{Path, PathBuf};

/// A discovered manager executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerPath {
    path: PathBuf,
    strategy: &'static str,
}

impl ManagerPath {
    pub fn new(path: impl Into<PathBuf>, strategy: &'static str) -> Self {
        Self {
            path: path.into(),
            strategy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the strategy that found it.
    pub const fn strategy(&self) -> &'static str {
        self.strategy
    }
}

/// A single candidate checked during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    /// Strategy that produced the candidate.
    pub strategy: &'static str,
    /// The path that was checked.
    pub candidate: PathBuf,
    pub outcome: AttemptOutcome,
}

/// Possible outcomes when checking a candidate path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// File was found and is executable (success case).
    Ok,
    NotFound,
    /// Path exists but is not a file (e.g., directory).
    NotAFile,
    NotExecutable,
    PermissionDenied,
    IoError(String),
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::NotFound => write!(f, "not found"),
            Self::NotAFile => write!(f, "not a file"),
            Self::NotExecutable => write!(f, "not executable"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::IoError(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

/// Everything discovery did, for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct LocateReport {
    pub resolved: Option<ManagerPath>,
    /// Strategies that ran, in order.
    pub strategies_run: Vec<&'static str>,
    pub attempts: Vec<Attempt>,
}

impl LocateReport {
    /// One line per checked candidate.
    pub fn describe_attempts(&self) -> String {
        if self.attempts.is_empty() {
            return "  (no candidates checked)".to_string();
        }
        self.attempts
            .iter()
            .map(|a| {
                format!(
                    "  [{}] {}: {}",
                    a.strategy,
                    a.candidate.display(),
                    a.outcome
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
