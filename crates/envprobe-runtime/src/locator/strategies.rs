//! Discovery strategies, one per search technique.
//!
//! Each strategy returns the candidates it checked. A strategy stops at its
//! first usable candidate; the locator stops at the first strategy that
//! produced one.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use envprobe_core::ports::{CommandRunner, Invocation};
use envprobe_core::ProcessEnv;
use tracing::debug;

use super::fs::FsProvider;
use super::types::{Attempt, AttemptOutcome};

const BIN_DIR: &str = "bin";

/// Install roots relative to the home directory, checked in order.
const HOME_INSTALL_ROOTS: &[&str] = &[
    "miniconda3",
    "anaconda3",
    "opt/miniconda3",
    "opt/anaconda3",
];

/// System-wide install roots, checked after the first home-relative group.
const SYSTEM_INSTALL_ROOTS: &[&str] = &["/opt/miniconda3", "/opt/anaconda3"];

/// Community distributions in the home directory.
const HOME_FORGE_ROOTS: &[&str] = &["miniforge3", "mambaforge"];

/// macOS application and Apple-silicon Homebrew locations.
const MACOS_INSTALL_ROOTS: &[&str] = &[
    "/Applications/anaconda3",
    "/Applications/miniconda3",
    "/opt/homebrew/anaconda3",
    "/opt/homebrew/miniconda3",
];

/// One way of finding the manager executable.
#[async_trait]
pub trait LocateStrategy: Send + Sync {
    /// Short identifier used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Check candidates in order, stopping at the first usable one.
    async fn search(&self, env: &ProcessEnv) -> Vec<Attempt>;
}

/// Check candidates in order, stopping after the first `Ok`.
fn check_in_order(
    strategy: &'static str,
    fs: &dyn FsProvider,
    candidates: impl IntoIterator<Item = PathBuf>,
) -> Vec<Attempt> {
    let mut attempts = Vec::new();
    for candidate in candidates {
        let outcome = fs.check_executable(&candidate);
        let found = outcome == AttemptOutcome::Ok;
        attempts.push(Attempt {
            strategy,
            candidate,
            outcome,
        });
        if found {
            break;
        }
    }
    attempts
}

// ============================================================================
// 1. Shell command resolution
// ============================================================================

/// Ask the shell where the manager is.
///
/// `which` answers with a path for a plain install. Conda's shell integration
/// usually replaces the command with a function; then the definition printed
/// by `type` is mined for the real executable.
pub struct ShellLookup {
    manager: String,
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn FsProvider>,
    timeout: Duration,
}

impl ShellLookup {
    pub const NAME: &'static str = "shell-lookup";

    pub fn new(
        manager: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        fs: Arc<dyn FsProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            manager: manager.into(),
            runner,
            fs,
            timeout,
        }
    }

    async fn search_definition(&self) -> Vec<Attempt> {
        // The name travels as a positional parameter, never spliced into the script.
        let invocation = Invocation::new("sh", self.timeout).args([
            "-c",
            "type \"$1\"",
            "sh",
            self.manager.as_str(),
        ]);

        match self.runner.run(&invocation).await {
            Ok(output) if output.success() => check_in_order(
                Self::NAME,
                self.fs.as_ref(),
                extract_definition_paths(&output.stdout, &self.manager),
            ),
            Ok(output) => {
                debug!(
                    "type {} exited with {:?}: {}",
                    self.manager,
                    output.exit_code,
                    output.stderr.trim()
                );
                Vec::new()
            }
            Err(e) => {
                debug!("Error analyzing {} definition: {e}", self.manager);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl LocateStrategy for ShellLookup {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn search(&self, _env: &ProcessEnv) -> Vec<Attempt> {
        let invocation = Invocation::new("which", self.timeout).arg(&self.manager);

        let output = match self.runner.run(&invocation).await {
            Ok(output) if output.success() => output,
            Ok(output) => {
                debug!("which {} exited with {:?}", self.manager, output.exit_code);
                return Vec::new();
            }
            Err(e) => {
                debug!("Error checking PATH: {e}");
                return Vec::new();
            }
        };

        let resolved = output.stdout.trim();
        if resolved.is_empty() {
            return Vec::new();
        }

        if is_function_definition(resolved, &self.manager) {
            return self.search_definition().await;
        }

        let candidate = Path::new(resolved);
        if candidate.is_absolute() && !resolved.contains('\n') {
            return check_in_order(Self::NAME, self.fs.as_ref(), [candidate.to_path_buf()]);
        }

        Vec::new()
    }
}

fn is_function_definition(text: &str, manager: &str) -> bool {
    text.contains(&format!("{manager} ()"))
        || text.contains(&format!("{manager} is a function"))
        || text.contains("aliased to")
}

/// Pull executable paths out of a shell function or alias definition.
///
/// A usable line mentions `/<manager>` next to a `bin/` or `Scripts/`
/// segment; the path is the last quoted token, or the last word.
pub fn extract_definition_paths(definition: &str, manager: &str) -> Vec<PathBuf> {
    let needle = format!("/{manager}");

    definition
        .lines()
        .filter(|line| {
            line.contains(&needle) && (line.contains("bin/") || line.contains("Scripts/"))
        })
        .filter_map(|line| {
            let token = if line.contains('\'') {
                line.rsplit('\'').nth(1)
            } else {
                line.split_whitespace().last()
            }?;
            let token = token.trim_matches(|c: char| c == '"' || c == ';' || c == '`');
            (!token.is_empty() && Path::new(token).is_absolute()).then(|| PathBuf::from(token))
        })
        .collect()
}

// ============================================================================
// 2. Conventional install locations
// ============================================================================

/// Probe the usual installer destinations.
pub struct ConventionalPaths {
    manager: String,
    fs: Arc<dyn FsProvider>,
}

impl ConventionalPaths {
    pub const NAME: &'static str = "conventional-paths";

    pub fn new(manager: impl Into<String>, fs: Arc<dyn FsProvider>) -> Self {
        Self {
            manager: manager.into(),
            fs,
        }
    }

    /// Candidate executables, in priority order.
    pub fn candidates(&self, home: Option<&Path>) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = Vec::new();
        if let Some(home) = home {
            roots.extend(HOME_INSTALL_ROOTS.iter().map(|r| home.join(r)));
        }
        roots.extend(SYSTEM_INSTALL_ROOTS.iter().map(PathBuf::from));
        if let Some(home) = home {
            roots.extend(HOME_FORGE_ROOTS.iter().map(|r| home.join(r)));
        }
        roots.extend(MACOS_INSTALL_ROOTS.iter().map(PathBuf::from));

        roots
            .into_iter()
            .map(|root| root.join(BIN_DIR).join(&self.manager))
            .collect()
    }
}

#[async_trait]
impl LocateStrategy for ConventionalPaths {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn search(&self, env: &ProcessEnv) -> Vec<Attempt> {
        let home = env.home_dir();
        check_in_order(
            Self::NAME,
            self.fs.as_ref(),
            self.candidates(home.as_deref()),
        )
    }
}

// ============================================================================
// 3. Homebrew prefix
// ============================================================================

/// Ask Homebrew where the manager's formula is installed.
pub struct HomebrewPrefix {
    manager: String,
    formula: String,
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn FsProvider>,
    timeout: Duration,
}

impl HomebrewPrefix {
    pub const NAME: &'static str = "homebrew-prefix";

    pub fn new(
        manager: impl Into<String>,
        formula: impl Into<String>,
        runner: Arc<dyn CommandRunner>,
        fs: Arc<dyn FsProvider>,
        timeout: Duration,
    ) -> Self {
        Self {
            manager: manager.into(),
            formula: formula.into(),
            runner,
            fs,
            timeout,
        }
    }
}

#[async_trait]
impl LocateStrategy for HomebrewPrefix {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn search(&self, _env: &ProcessEnv) -> Vec<Attempt> {
        let invocation = Invocation::new("brew", self.timeout).args(["--prefix", self.formula.as_str()]);

        match self.runner.run(&invocation).await {
            Ok(output) if output.success() && !output.stdout.trim().is_empty() => {
                let prefix = PathBuf::from(output.stdout.trim());
                check_in_order(
                    Self::NAME,
                    self.fs.as_ref(),
                    [prefix.join(BIN_DIR).join(&self.manager)],
                )
            }
            Ok(_) => Vec::new(),
            Err(e) => {
                debug!("Error checking Homebrew: {e}");
                Vec::new()
            }
        }
    }
}

// ============================================================================
// 4. Home directory scan
// ============================================================================

/// Look for `~/*<family>*/bin/<manager>`.
pub struct HomeScan {
    manager: String,
    family: String,
    fs: Arc<dyn FsProvider>,
}

impl HomeScan {
    pub const NAME: &'static str = "home-scan";

    pub fn new(
        manager: impl Into<String>,
        family: impl Into<String>,
        fs: Arc<dyn FsProvider>,
    ) -> Self {
        Self {
            manager: manager.into(),
            family: family.into(),
            fs,
        }
    }
}

#[async_trait]
impl LocateStrategy for HomeScan {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn search(&self, env: &ProcessEnv) -> Vec<Attempt> {
        let Some(home) = env.home_dir() else {
            return Vec::new();
        };

        let candidates: Vec<PathBuf> = self
            .fs
            .list_dir(&home)
            .into_iter()
            .filter(|entry| {
                entry
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().contains(&self.family))
            })
            .filter(|entry| self.fs.is_dir(entry))
            .map(|dir| dir.join(BIN_DIR).join(&self.manager))
            .collect();

        check_in_order(Self::NAME, self.fs.as_ref(), candidates)
    }
}
