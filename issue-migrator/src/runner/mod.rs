//! Orchestrates a single migrator invocation.

mod config;
mod error;

pub use config::{Mode, Overrides, RunnerConfig, Task, TOKEN_ENV_VAR};
pub use error::RunnerError;

use crate::labels::provision_labels;
use crate::links::LinkRewriter;
use crate::migrate::{load_milestones, MigrationJob, Migrator};
use crate::rate_limit::Pacer;
use crate::state::StateStore;
use crate::summary::RunSummary;
use crate::tracker::{IssueTracker, OctocrabTracker};
use tracing::{info, warn};

/// Runs the task described by a [`RunnerConfig`] against an issue tracker.
pub struct Runner<T: IssueTracker = OctocrabTracker> {
    config: RunnerConfig,
    tracker: T,
    pacer: Pacer,
}

impl Runner<OctocrabTracker> {
    /// Builds a runner backed by the GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Octocrab`] if the client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let tracker = OctocrabTracker::new(config.token(), config.user())?;
        Ok(Self::with_tracker(config, tracker))
    }
}

impl<T: IssueTracker> Runner<T> {
    /// Builds a runner over any tracker, pacing writes per the config.
    pub fn with_tracker(config: RunnerConfig, tracker: T) -> Self {
        let pacer = Pacer::new(config.pause());
        Self {
            config,
            tracker,
            pacer,
        }
    }

    /// Replaces the write pacer.
    #[must_use]
    pub fn with_pacer(mut self, pacer: Pacer) -> Self {
        self.pacer = pacer;
        self
    }

    /// Returns the underlying tracker.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Consumes the runner, returning the tracker.
    pub fn into_tracker(self) -> T {
        self.tracker
    }

    /// Executes the configured task.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] on the first fatal failure. State written
    /// before the failure stays on disk.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let config = &self.config;
        let target = config.target();
        let store = StateStore::new(config.state_path(), config.dry_run());
        let pacer = self.pacer.clone();

        match config.task() {
            Task::Labels { labels } => {
                let mut pacer = pacer;
                let summary =
                    provision_labels(&self.tracker, target, labels, &mut pacer, config.dry_run())
                        .await?;
                Ok(summary)
            }
            Task::Migrate {
                repo_key,
                source,
                label_map,
            } => {
                let milestones = load_milestones(&self.tracker, target).await?;
                info!(count = milestones.len(), target = %target, "Loaded target milestones");

                let mut state = store.load(config.clean())?;
                let job = MigrationJob {
                    repo_key,
                    source,
                    target,
                    label_map,
                    milestones: &milestones,
                };

                let summary = Migrator::new(&self.tracker, &store, pacer)
                    .oneshot(config.oneshot())
                    .run(&job, &mut state)
                    .await?;
                Ok(summary)
            }
            Task::Links { repo_keys, pattern } => {
                if config.clean() {
                    warn!("--clean has no effect when rewriting links");
                }
                let mut state = store.load(false)?;

                let summary = LinkRewriter::new(
                    &self.tracker,
                    &store,
                    pacer,
                    pattern.clone(),
                    repo_keys.clone(),
                )
                .run(target, &mut state)
                .await?;
                Ok(summary)
            }
        }
    }
}
