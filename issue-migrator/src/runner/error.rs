//! Runner error types.

use crate::migrate::MigrateError;
use crate::rate_limit::RateLimitInfo;
use crate::state::StateError;
use crate::tracker::TrackerError;

/// Errors that can occur while running the migrator.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration loading and resolution errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// A remote write, state write or render failed mid-run.
    #[error(transparent)]
    Migrate(#[from] MigrateError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),
}

impl From<TrackerError> for RunnerError {
    fn from(error: TrackerError) -> Self {
        Self::Migrate(error.into())
    }
}

impl From<StateError> for RunnerError {
    fn from(error: StateError) -> Self {
        Self::Migrate(error.into())
    }
}

impl RunnerError {
    /// Returns the rate limit captured with a remote failure, if any.
    #[must_use]
    pub fn rate_limit(&self) -> Option<&RateLimitInfo> {
        match self {
            Self::Migrate(MigrateError::Tracker(e)) => e.rate_limit(),
            _ => None,
        }
    }

    /// Returns whether the failure happened before any remote call.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
