//! Runner configuration.

use crate::config::{Config, ConfigError, RepoRef};
use crate::links::compile_reference_pattern;
use crate::mapping::LabelMap;
use crate::rate_limit::DEFAULT_PAUSE;
use crate::state::DEFAULT_STATE_FILE;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when no token is configured.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// What the operator asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Migrate the open issues of one configured source repository.
    Migrate { repo_key: String },
    /// Provision the configured labels on the target.
    Labels,
    /// Rewrite cross-issue references in target issues.
    Links,
}

/// Values given on the command line; each overrides the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub target: Option<String>,
    pub user: Option<String>,
    pub token: Option<String>,
    pub state: Option<PathBuf>,
    /// Seconds to pause after each write.
    pub pause: Option<u64>,
    pub dry_run: bool,
    pub clean: bool,
    pub oneshot: bool,
}

/// A [`Mode`] with everything it needs resolved from configuration.
#[derive(Debug, Clone)]
pub enum Task {
    Migrate {
        repo_key: String,
        source: RepoRef,
        label_map: LabelMap,
    },
    Labels {
        /// Label name and normalized color, in name order.
        labels: Vec<(String, String)>,
    },
    Links {
        /// Lowercased `owner/name` to repo key.
        repo_keys: BTreeMap<String, String>,
        pattern: Regex,
    },
}

/// Fully resolved configuration for a run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// The work to perform.
    task: Task,
    /// Repository receiving issues, comments and labels.
    target: RepoRef,
    /// GitHub token used for API calls.
    token: String,
    /// Basic-auth user to pair with the token.
    user: Option<String>,
    /// State file path.
    state_path: PathBuf,
    /// Pause after each write.
    pause: Duration,
    /// Whether to preview changes without writing anything.
    dry_run: bool,
    /// Whether to ignore existing state.
    clean: bool,
    /// Whether to stop after one issue.
    oneshot: bool,
}

impl RunnerConfig {
    /// Resolves command-line overrides against the config file.
    ///
    /// Precedence is command line, then config file, then `GITHUB_TOKEN`
    /// (token only), then built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a missing token or target, a malformed
    /// repository reference, an unknown repo key, missing or invalid labels,
    /// or an invalid link pattern.
    pub fn resolve(mode: Mode, overrides: Overrides, config: &Config) -> Result<Self, ConfigError> {
        let token = overrides
            .token
            .or_else(|| config.auth.token.clone())
            .or_else(|| std::env::var(TOKEN_ENV_VAR).ok())
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingToken)?;

        let target = overrides
            .target
            .as_deref()
            .or(config.target.as_deref())
            .ok_or(ConfigError::MissingTarget)
            .and_then(RepoRef::parse)?;

        let task = match mode {
            Mode::Migrate { repo_key } => {
                let repo = config.repo(&repo_key)?;
                Task::Migrate {
                    source: RepoRef::parse(&repo.name)?,
                    label_map: repo.label_mapping.clone(),
                    repo_key,
                }
            }
            Mode::Labels => Task::Labels {
                labels: config.label_colors()?,
            },
            Mode::Links => Task::Links {
                repo_keys: config.repo_keys_by_name()?,
                pattern: compile_reference_pattern(config.link_pattern.as_deref())?,
            },
        };

        let state_path = overrides
            .state
            .or_else(|| config.state.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

        Ok(Self {
            task,
            target,
            token,
            user: overrides.user.or_else(|| config.auth.user.clone()),
            state_path,
            pause: overrides.pause.map_or(DEFAULT_PAUSE, Duration::from_secs),
            dry_run: overrides.dry_run,
            clean: overrides.clean,
            oneshot: overrides.oneshot,
        })
    }

    /// Returns the resolved task.
    pub fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the target repository.
    pub fn target(&self) -> &RepoRef {
        &self.target
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the basic-auth user, if any.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Returns the state file path.
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Returns the pause after each write.
    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns whether existing state should be ignored.
    pub fn clean(&self) -> bool {
        self.clean
    }

    /// Returns whether oneshot mode is enabled.
    pub fn oneshot(&self) -> bool {
        self.oneshot
    }
}
