//! Manager executable discovery.
//!
//! The manager has no fixed install location, so discovery runs an ordered
//! list of strategies and stops at the first one that yields a usable path:
//!
//! 1. `shell-lookup` - `which`, following shell function definitions
//! 2. `conventional-paths` - installer default directories
//! 3. `homebrew-prefix` - `brew --prefix <formula>`
//! 4. `home-scan` - `~/*<family>*/bin/<manager>`
//!
//! ## Architecture
//!
//! - `types`: `ManagerPath`, `Attempt`, `AttemptOutcome`, `LocateReport`
//! - `fs`: filesystem trait (injectable for testing)
//! - `strategies`: the `LocateStrategy` trait and its four implementations
//!
//! Discovery is never cached; every call searches again. Not finding the
//! manager is a normal outcome (`None`), not an error.

mod fs;
mod strategies;
mod types;

use std::sync::Arc;

use envprobe_core::ports::CommandRunner;
use envprobe_core::{ProcessEnv, Settings};
use tracing::debug;

pub use fs::{FsProvider, SystemFs};
pub use strategies::{
    ConventionalPaths, HomeScan, HomebrewPrefix, LocateStrategy, ShellLookup,
    extract_definition_paths,
};
pub use types::{Attempt, AttemptOutcome, LocateReport, ManagerPath};

#[cfg(test)]
pub use fs::MockFs;

/// Ordered, first-hit-wins executable discovery.
pub struct ExecutableLocator {
    strategies: Vec<Box<dyn LocateStrategy>>,
}

impl ExecutableLocator {
    /// The standard four-strategy search configured from settings.
    pub fn standard(
        settings: &Settings,
        runner: Arc<dyn CommandRunner>,
        fs: Arc<dyn FsProvider>,
    ) -> Self {
        let manager = settings.effective_manager();
        let timeout = settings.command_timeout();

        Self::with_strategies(vec![
            Box::new(ShellLookup::new(
                manager,
                Arc::clone(&runner),
                Arc::clone(&fs),
                timeout,
            )),
            Box::new(ConventionalPaths::new(manager, Arc::clone(&fs))),
            Box::new(HomebrewPrefix::new(
                manager,
                settings.effective_brew_formula(),
                runner,
                Arc::clone(&fs),
                timeout,
            )),
            Box::new(HomeScan::new(manager, settings.effective_family(), fs)),
        ])
    }

    /// A locator running exactly these strategies, in this order.
    pub fn with_strategies(strategies: Vec<Box<dyn LocateStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Find the manager, or `None` if no strategy succeeds.
    pub async fn locate(&self, env: &ProcessEnv) -> Option<ManagerPath> {
        self.locate_with_report(env).await.resolved
    }

    /// Find the manager and keep every attempt for diagnostics.
    pub async fn locate_with_report(&self, env: &ProcessEnv) -> LocateReport {
        let mut report = LocateReport::default();

        for strategy in &self.strategies {
            let name = strategy.name();
            report.strategies_run.push(name);

            let attempts = strategy.search(env).await;
            let success = find_success(&attempts).map(|a| a.candidate.clone());
            report.attempts.extend(attempts);

            if let Some(path) = success {
                debug!("Found manager via {name}: {}", path.display());
                report.resolved = Some(ManagerPath::new(path, name));
                return report;
            }
            debug!("Strategy {name} found nothing");
        }

        debug!(
            "Manager not found. Tried:\n{}",
            report.describe_attempts()
        );
        report
    }
}

/// Find the first successful attempt in a list.
fn find_success(attempts: &[Attempt]) -> Option<&Attempt> {
    attempts.iter().find(|a| a.outcome == AttemptOutcome::Ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingRunner;
    use async_trait::async_trait;
    use envprobe_core::CommandOutput;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Strategy stub that counts its invocations.
    struct CountingStrategy {
        name: &'static str,
        hit: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl LocateStrategy for CountingStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn search(&self, _env: &ProcessEnv) -> Vec<Attempt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (candidate, outcome) = match self.hit {
                Some(path) => (PathBuf::from(path), AttemptOutcome::Ok),
                None => (PathBuf::from("/nowhere/conda"), AttemptOutcome::NotFound),
            };
            vec![Attempt {
                strategy: self.name,
                candidate,
                outcome,
            }]
        }
    }

    fn counting(
        name: &'static str,
        hit: Option<&'static str>,
    ) -> (Box<dyn LocateStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = CountingStrategy {
            name,
            hit,
            calls: Arc::clone(&calls),
        };
        (Box::new(strategy), calls)
    }

    #[tokio::test]
    async fn test_first_successful_strategy_wins_and_later_ones_never_run() {
        for winner in 0..4 {
            let mut strategies = Vec::new();
            let mut counters = Vec::new();
            for i in 0..4 {
                let hit = (i >= winner).then_some("/found/bin/conda");
                let (s, c) = counting(["a", "b", "c", "d"][i], hit);
                strategies.push(s);
                counters.push(c);
            }
            let locator = ExecutableLocator::with_strategies(strategies);

            let found = locator.locate(&ProcessEnv::default()).await.unwrap();

            assert_eq!(found.strategy(), ["a", "b", "c", "d"][winner]);
            for (i, counter) in counters.iter().enumerate() {
                let expected = usize::from(i <= winner);
                assert_eq!(counter.load(Ordering::SeqCst), expected, "strategy {i}");
            }
        }
    }

    #[tokio::test]
    async fn test_total_failure_is_none_with_report() {
        let (a, _) = counting("a", None);
        let (b, _) = counting("b", None);
        let locator = ExecutableLocator::with_strategies(vec![a, b]);

        let report = locator.locate_with_report(&ProcessEnv::default()).await;

        assert!(report.resolved.is_none());
        assert_eq!(report.strategies_run, vec!["a", "b"]);
        assert_eq!(report.attempts.len(), 2);
        assert!(report.describe_attempts().contains("[b] /nowhere/conda: not found"));
    }

    #[test]
    fn test_standard_order() {
        let locator = ExecutableLocator::standard(
            &Settings::default(),
            Arc::new(RecordingRunner::new()),
            Arc::new(MockFs::new()),
        );
        assert_eq!(
            locator.strategy_names(),
            vec!["shell-lookup", "conventional-paths", "homebrew-prefix", "home-scan"]
        );
    }

    #[tokio::test]
    async fn test_standard_skips_brew_when_conventional_path_exists() {
        let runner = Arc::new(RecordingRunner::new().fail_spawn("which"));
        let fs = Arc::new(MockFs::new().with_executable("/home/me/miniconda3/bin/conda"));
        let locator = ExecutableLocator::standard(&Settings::default(), runner.clone(), fs);
        let env = ProcessEnv::from_pairs([("HOME", "/home/me")]);

        let found = locator.locate(&env).await.unwrap();

        assert_eq!(found.path(), PathBuf::from("/home/me/miniconda3/bin/conda"));
        assert_eq!(found.strategy(), ConventionalPaths::NAME);
        assert_eq!(runner.programs(), vec!["which"]);
    }

    #[tokio::test]
    async fn test_standard_falls_through_to_home_scan() {
        let runner = Arc::new(
            RecordingRunner::new()
                .respond("which", CommandOutput::failed(1, ""))
                .respond("brew", CommandOutput::failed(1, "Error: No available formula")),
        );
        let fs = Arc::new(
            MockFs::new()
                .with_dir("/home/me/condaforge-custom")
                .with_executable("/home/me/condaforge-custom/bin/conda"),
        );
        let locator = ExecutableLocator::standard(&Settings::default(), runner.clone(), fs);
        let env = ProcessEnv::from_pairs([("HOME", "/home/me")]);

        let found = locator.locate(&env).await.unwrap();

        assert_eq!(found.strategy(), HomeScan::NAME);
        assert_eq!(runner.programs(), vec!["which", "brew"]);
    }
}
