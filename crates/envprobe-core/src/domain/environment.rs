//! Managed environments and the result of listing them.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// An isolated runtime environment reported by the manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub path: PathBuf,
    pub is_base: bool,
}

impl Environment {
    /// The installation root, always reported as `base`.
    pub fn base(path: impl Into<PathBuf>) -> Self {
        Self {
            name: "base".to_string(),
            path: path.into(),
            is_base: true,
        }
    }

    /// A non-root environment, named by the last component of its prefix.
    ///
    /// A prefix without a final component keeps its full path as its name.
    pub fn from_prefix(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        Self {
            name,
            path,
            is_base: false,
        }
    }

    /// Name a manager's prefix list, marking exactly one entry as the root.
    ///
    /// The root is the first prefix whose last component is `base` or whose
    /// `envs` directory holds another listed prefix. When no prefix
    /// qualifies, the first one is the root.
    pub fn from_prefixes(prefixes: Vec<PathBuf>) -> Vec<Self> {
        let root = prefixes
            .iter()
            .position(|p| is_root_prefix(p, &prefixes))
            .or_else(|| (!prefixes.is_empty()).then_some(0));

        prefixes
            .into_iter()
            .enumerate()
            .map(|(i, path)| {
                if Some(i) == root {
                    Self::base(path)
                } else {
                    Self::from_prefix(path)
                }
            })
            .collect()
    }
}

fn is_root_prefix(candidate: &Path, all: &[PathBuf]) -> bool {
    if candidate.file_name().is_some_and(|n| n == "base") {
        return true;
    }
    let envs_dir = candidate.join("envs");
    all.iter().any(|p| p.parent() == Some(envs_dir.as_path()))
}

/// Outcome of enumerating environments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvironmentListing {
    /// Machine-readable listing, in the manager's order, deduplicated by path.
    Parsed {
        manager: PathBuf,
        environments: Vec<Environment>,
    },
    /// Human-readable listing returned verbatim after the JSON form failed.
    Raw { manager: PathBuf, text: String },
    /// The manager is not installed; carries a troubleshooting diagnostic.
    ManagerNotFound { diagnostic: String },
}

impl EnvironmentListing {
    /// Environments, when the listing was parsed.
    pub fn environments(&self) -> &[Environment] {
        match self {
            Self::Parsed { environments, .. } => environments,
            _ => &[],
        }
    }
}

impl fmt::Display for EnvironmentListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parsed {
                manager,
                environments,
            } => {
                writeln!(f, "Conda found at: {}", manager.display())?;
                writeln!(f)?;
                writeln!(f, "Conda Environments:")?;
                for env in environments {
                    writeln!(f, "- {} ({})", env.name, env.path.display())?;
                }
                Ok(())
            }
            Self::Raw { manager, text } => {
                writeln!(f, "Conda found at: {}", manager.display())?;
                writeln!(f)?;
                if text.trim().is_empty() {
                    write!(f, "No conda environments found.")
                } else {
                    write!(f, "{text}")
                }
            }
            Self::ManagerNotFound { diagnostic } => f.write_str(diagnostic),
        }
    }
}
