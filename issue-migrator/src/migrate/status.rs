//! Per-item outcome types.

/// What happened to a source issue during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueStatus {
    /// Issue created on the target in this run.
    Created {
        /// Target issue number.
        number: u64,
    },

    /// Issue was created by an earlier run.
    Cached {
        /// Target issue number.
        number: u64,
    },

    /// Dry run: the issue would have been created.
    WouldCreate,

    /// The source "issue" is a pull request and is never migrated.
    SkippedPullRequest,
}

/// What happened to a source comment during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentStatus {
    /// Comment created on the target in this run.
    Created {
        /// Target comment id.
        id: u64,
    },

    /// Comment was created by an earlier run.
    Cached,

    /// Dry run: the comment would have been created.
    WouldCreate,
}

impl IssueStatus {
    /// Short progress marker.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Created { .. } => "[created]",
            Self::Cached { .. } => "[cached]",
            Self::WouldCreate => "[dry-run]",
            Self::SkippedPullRequest => "[skip]",
        }
    }
}

impl CommentStatus {
    /// Short progress marker.
    #[must_use]
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Created { .. } => "[created]",
            Self::Cached => "[cached]",
            Self::WouldCreate => "[dry-run]",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_match_progress_output() {
        assert_eq!(IssueStatus::Created { number: 1 }.marker(), "[created]");
        assert_eq!(IssueStatus::Cached { number: 1 }.marker(), "[cached]");
        assert_eq!(IssueStatus::WouldCreate.marker(), "[dry-run]");
        assert_eq!(IssueStatus::SkippedPullRequest.marker(), "[skip]");
        assert_eq!(CommentStatus::Cached.marker(), "[cached]");
        assert_eq!(CommentStatus::WouldCreate.marker(), "[dry-run]");
    }
}
