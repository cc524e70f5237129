//! Rate limiting utilities for the GitHub API.
//!
//! This module paces writes with fixed pauses and periodic cool-downs, and
//! queries the current core rate limit for failure diagnostics.

mod info;
mod pacer;

pub use info::RateLimitInfo;
pub use pacer::{Pacer, DEFAULT_COOLDOWN, DEFAULT_COOLDOWN_EVERY, DEFAULT_PAUSE};

use octocrab::Octocrab;

/// Checks the current rate limit status for core API (issues, comments, labels).
///
/// # Errors
///
/// Returns an error if the rate limit API call fails.
pub async fn check_core_rate_limit(octocrab: &Octocrab) -> Result<RateLimitInfo, octocrab::Error> {
    let rate_limit = octocrab.ratelimit().get().await?;
    let core = &rate_limit.resources.core;

    Ok(RateLimitInfo {
        remaining: core.remaining as u32,
        reset: core.reset,
        limit: core.limit as u32,
    })
}
