//! `EnvProbeService` - the operations callers use.
//!
//! Every operation validates its input first, then captures a fresh
//! [`ProcessEnv`] snapshot and re-discovers the manager. Nothing is cached
//! between calls.

use std::sync::Arc;

use envprobe_core::ports::CommandRunner;
use envprobe_core::{
    CapabilityReport, EnvTarget, EnvironmentListing, Framework, InventoryCategory, ProbeError,
    ProcessEnv, Settings,
};
use tracing::debug;

use crate::command::TokioCommandRunner;
use crate::inventory::run_inventory;
use crate::locator::{ExecutableLocator, FsProvider, LocateReport, ManagerPath, SystemFs};
use crate::manager::{EnvironmentEnumerator, PackageLister, manager_info, not_found_diagnostic};
use crate::probe::CapabilityProbeRunner;

/// Text shown by the summary when no manager is installed.
const MANAGER_NOT_FOUND: &str = "Conda not found";

/// Where the per-call environment snapshot comes from.
#[derive(Debug, Clone)]
enum EnvSource {
    /// Capture the live process environment on every call.
    Live,
    /// Use a fixed snapshot (tests, embedding).
    Fixed(ProcessEnv),
}

/// Discovery, enumeration and probing behind one injected runner.
pub struct EnvProbeService {
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn FsProvider>,
    settings: Settings,
    env_source: EnvSource,
}

impl EnvProbeService {
    /// Create a service with injected dependencies.
    pub fn new(runner: Arc<dyn CommandRunner>, fs: Arc<dyn FsProvider>, settings: Settings) -> Self {
        Self {
            runner,
            fs,
            settings,
            env_source: EnvSource::Live,
        }
    }

    /// Production wiring: tokio subprocesses and the real filesystem.
    pub fn system(settings: Settings) -> Self {
        Self::new(Arc::new(TokioCommandRunner::new()), Arc::new(SystemFs), settings)
    }

    /// Use `env` instead of the live process environment.
    #[must_use]
    pub fn with_process_env(mut self, env: ProcessEnv) -> Self {
        self.env_source = EnvSource::Fixed(env);
        self
    }

    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    fn snapshot(&self) -> ProcessEnv {
        match &self.env_source {
            EnvSource::Live => ProcessEnv::capture(),
            EnvSource::Fixed(env) => env.clone(),
        }
    }

    fn locator(&self) -> ExecutableLocator {
        ExecutableLocator::standard(&self.settings, Arc::clone(&self.runner), Arc::clone(&self.fs))
    }

    async fn require_manager(&self, env: &ProcessEnv) -> Result<ManagerPath, ProbeError> {
        self.locator()
            .locate(env)
            .await
            .ok_or(ProbeError::ExecutableNotFound)
    }

    /// Locate the manager, keeping every checked candidate.
    pub async fn locate(&self) -> LocateReport {
        let env = self.snapshot();
        self.locator().locate_with_report(&env).await
    }

    /// `<manager> info` output.
    pub async fn manager_info(&self) -> Result<String, ProbeError> {
        let env = self.snapshot();
        let manager = self.require_manager(&env).await?;
        manager_info(self.runner.as_ref(), &manager, self.settings.command_timeout()).await
    }

    /// Environments known to the manager.
    ///
    /// A missing manager is not an error here: the listing carries a
    /// troubleshooting diagnostic instead.
    pub async fn list_environments(&self) -> Result<EnvironmentListing, ProbeError> {
        let env = self.snapshot();
        let Some(manager) = self.locator().locate(&env).await else {
            return Ok(EnvironmentListing::ManagerNotFound {
                diagnostic: not_found_diagnostic(&env),
            });
        };

        EnvironmentEnumerator::new(Arc::clone(&self.runner), self.settings.command_timeout())
            .list(&manager)
            .await
    }

    /// Package table of one environment, by name or absolute prefix.
    pub async fn list_packages(&self, name_or_path: &str) -> Result<String, ProbeError> {
        let target = EnvTarget::parse(name_or_path)?;

        let env = self.snapshot();
        let manager = self.require_manager(&env).await?;

        PackageLister::new(Arc::clone(&self.runner), self.settings.command_timeout())
            .list(&manager, &target)
            .await
    }

    /// Probe `framework`'s accelerator support inside one environment.
    pub async fn probe(
        &self,
        name_or_path: &str,
        framework: Framework,
    ) -> Result<CapabilityReport, ProbeError> {
        let target = EnvTarget::parse(name_or_path)?;

        let env = self.snapshot();
        let manager = self.require_manager(&env).await?;
        debug!("Probing {framework} in {target} via {}", manager.path().display());

        CapabilityProbeRunner::new(Arc::clone(&self.runner), &self.settings)
            .probe(&manager, &target, framework, &env)
            .await
    }

    /// Manager info, environments and optionally one package table, as text.
    ///
    /// Each section renders its own failure in place; the summary itself never fails.
    pub async fn summary(&self, env_name: Option<&str>) -> String {
        let info = match self.manager_info().await {
            Ok(text) => text,
            Err(ProbeError::ExecutableNotFound) => MANAGER_NOT_FOUND.to_string(),
            Err(e) => e.to_string(),
        };
        let listing = match self.list_environments().await {
            Ok(listing) => listing.to_string(),
            Err(e) => e.to_string(),
        };

        let mut out = format!("{info}\n\n{listing}");
        if let Some(name) = env_name.filter(|n| !n.is_empty()) {
            let packages = self
                .list_packages(name)
                .await
                .unwrap_or_else(|e| e.to_string());
            out.push_str(&format!("\n\nPackages in {name}:\n\n{packages}"));
        }
        out
    }

    /// `system_profiler` report for an allow-listed category.
    pub async fn inventory(&self, category: &str) -> Result<String, ProbeError> {
        let category: InventoryCategory = category.parse()?;
        run_inventory(self.runner.as_ref(), category, self.settings.command_timeout()).await
    }
}
