//! Remote API error types.

use crate::rate_limit::RateLimitInfo;
use thiserror::Error;

/// HTTP status GitHub answers with when a label name is already taken.
const UNPROCESSABLE_ENTITY: u16 = 422;

/// Errors returned by [`IssueTracker`](super::IssueTracker) calls.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The API answered with a non-success response or could not be reached.
    #[error("GitHub API error while trying to {action}: {message}")]
    Api {
        /// What was being attempted, e.g. "create issue".
        action: String,
        /// HTTP status, when the client surfaced one.
        status: Option<u16>,
        /// Error message.
        message: String,
        /// Core rate limit at the time of failure, if it could be fetched.
        rate_limit: Option<RateLimitInfo>,
    },
}

impl TrackerError {
    /// Creates an API error without status or rate limit details.
    pub fn api(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            action: action.into(),
            status: None,
            message: message.into(),
            rate_limit: None,
        }
    }

    /// Returns the HTTP status of the failed response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
        }
    }

    /// Returns the rate limit captured with the failure.
    #[must_use]
    pub fn rate_limit(&self) -> Option<&RateLimitInfo> {
        match self {
            Self::Api { rate_limit, .. } => rate_limit.as_ref(),
        }
    }

    /// Returns whether the failure means the resource already exists.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        self.status() == Some(UNPROCESSABLE_ENTITY)
    }
}
