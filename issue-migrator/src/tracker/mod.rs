//! Issue tracker access.
//!
//! [`IssueTracker`] is the seam between the migration logic and the remote
//! API. [`OctocrabTracker`] talks to GitHub; tests substitute an in-memory
//! implementation.

mod error;
mod github;

pub use error::TrackerError;
pub use github::OctocrabTracker;

use crate::config::RepoRef;
use chrono::{DateTime, Utc};
use std::future::Future;

/// Page size used for every paginated listing.
pub const PER_PAGE: u8 = 100;

/// The user who wrote an issue or comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub login: String,
    pub avatar_url: String,
}

/// An issue as listed by the tracker.
#[derive(Debug, Clone)]
pub struct RemoteIssue {
    pub number: u64,
    pub title: String,
    /// Issue body; empty when the issue has none.
    pub body: String,
    pub author: Author,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
    pub assignee: Option<String>,
    /// Milestone title.
    pub milestone: Option<String>,
    pub labels: Vec<String>,
    /// Number of comments on the issue.
    pub comments: u32,
    /// Whether this "issue" is actually a pull request.
    pub is_pull_request: bool,
}

/// A comment on an issue.
#[derive(Debug, Clone)]
pub struct RemoteComment {
    pub id: u64,
    pub body: String,
    pub author: Author,
    pub html_url: String,
    pub created_at: DateTime<Utc>,
}

/// A milestone on the target repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub number: u64,
    pub title: String,
}

/// Everything needed to create an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub milestone: Option<u64>,
    pub assignee: Option<String>,
}

/// Remote operations used by the migration.
///
/// Listing methods take a 1-based page number and return an empty vector
/// past the last page.
pub trait IssueTracker: Send + Sync {
    /// Lists open issues, least recently updated first.
    fn list_open_issues(
        &self,
        repo: &RepoRef,
        page: u32,
    ) -> impl Future<Output = Result<Vec<RemoteIssue>, TrackerError>> + Send;

    /// Lists the comments of an issue, oldest first.
    fn list_comments(
        &self,
        repo: &RepoRef,
        number: u64,
        page: u32,
    ) -> impl Future<Output = Result<Vec<RemoteComment>, TrackerError>> + Send;

    /// Lists milestones in any state.
    fn list_milestones(
        &self,
        repo: &RepoRef,
        page: u32,
    ) -> impl Future<Output = Result<Vec<Milestone>, TrackerError>> + Send;

    /// Creates an issue and returns its number.
    fn create_issue(
        &self,
        repo: &RepoRef,
        issue: &NewIssue,
    ) -> impl Future<Output = Result<u64, TrackerError>> + Send;

    /// Creates a comment and returns its id.
    fn create_comment(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> impl Future<Output = Result<u64, TrackerError>> + Send;

    /// Replaces the body of an issue.
    fn update_issue_body(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> impl Future<Output = Result<(), TrackerError>> + Send;

    /// Creates a label.
    fn create_label(
        &self,
        repo: &RepoRef,
        name: &str,
        color: &str,
    ) -> impl Future<Output = Result<(), TrackerError>> + Send;

    /// Updates the color of an existing label.
    fn update_label(
        &self,
        repo: &RepoRef,
        name: &str,
        color: &str,
    ) -> impl Future<Output = Result<(), TrackerError>> + Send;
}
