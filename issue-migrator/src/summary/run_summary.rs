//! Run summary types.

use crate::migrate::{CommentStatus, IssueStatus};
use std::collections::BTreeSet;

/// Summary of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of issues created on the target.
    pub issues_created: usize,

    /// Number of issues already created by an earlier run.
    pub issues_cached: usize,

    /// Number of issues a dry run would have created.
    pub issues_would_create: usize,

    /// Number of pull requests passed over.
    pub pull_requests_skipped: usize,

    /// Number of comments created on the target.
    pub comments_created: usize,

    /// Number of comments already created by an earlier run.
    pub comments_cached: usize,

    /// Number of comments a dry run would have created.
    pub comments_would_create: usize,

    /// Number of labels created.
    pub labels_created: usize,

    /// Number of existing labels updated.
    pub labels_updated: usize,

    /// Number of target issues whose references were rewritten.
    pub links_rewritten: usize,

    /// Number of state file writes.
    pub state_saves: usize,

    /// Source labels that had no mapping.
    pub unmapped_labels: BTreeSet<String>,

    /// Source milestones with no matching title on the target.
    pub unmapped_milestones: BTreeSet<String>,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with an issue outcome.
    pub fn record_issue(&mut self, status: &IssueStatus) {
        match status {
            IssueStatus::Created { .. } => self.issues_created += 1,
            IssueStatus::Cached { .. } => self.issues_cached += 1,
            IssueStatus::WouldCreate => self.issues_would_create += 1,
            IssueStatus::SkippedPullRequest => self.pull_requests_skipped += 1,
        }
    }

    /// Updates the summary with a comment outcome.
    pub fn record_comment(&mut self, status: &CommentStatus) {
        match status {
            CommentStatus::Created { .. } => self.comments_created += 1,
            CommentStatus::Cached => self.comments_cached += 1,
            CommentStatus::WouldCreate => self.comments_would_create += 1,
        }
    }

    /// Total number of remote writes performed.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.issues_created
            + self.comments_created
            + self.labels_created
            + self.labels_updated
            + self.links_rewritten
    }

    /// Returns true if any mapping misses occurred.
    #[must_use]
    pub fn has_mapping_misses(&self) -> bool {
        !self.unmapped_labels.is_empty() || !self.unmapped_milestones.is_empty()
    }
}
