//! Persistent migration state.
//!
//! The state remembers, per source repository key and source issue number,
//! the target issue that was created for it and which source comments have
//! already been copied. It is what makes an interrupted run resumable.

mod error;
mod store;

pub use error::StateError;
pub use store::{StateStore, DEFAULT_STATE_FILE};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Everything a previous run has written to the target repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationState {
    /// Repo key to source issue number to entry.
    #[serde(default)]
    repos: BTreeMap<String, BTreeMap<u64, IssueEntry>>,

    /// Target issue number to the references already rewritten in its body.
    #[serde(default, rename = "_links")]
    links: BTreeMap<u64, BTreeSet<String>>,
}

/// A source issue that has been created on the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueEntry {
    /// Target issue number.
    pub new_id: u64,

    /// Source comment id to target comment id.
    #[serde(default)]
    pub comments: BTreeMap<u64, u64>,
}

impl IssueEntry {
    fn new(new_id: u64) -> Self {
        Self {
            new_id,
            comments: BTreeMap::new(),
        }
    }
}

impl MigrationState {
    /// Returns the entry for a source issue, if it was already created.
    #[must_use]
    pub fn issue(&self, repo_key: &str, number: u64) -> Option<&IssueEntry> {
        self.repos.get(repo_key)?.get(&number)
    }

    /// Returns the target issue number for a source issue.
    #[must_use]
    pub fn new_id(&self, repo_key: &str, number: u64) -> Option<u64> {
        self.issue(repo_key, number).map(|entry| entry.new_id)
    }

    /// Returns whether a source comment was already created on the target.
    #[must_use]
    pub fn has_comment(&self, repo_key: &str, number: u64, comment_id: u64) -> bool {
        self.issue(repo_key, number)
            .is_some_and(|entry| entry.comments.contains_key(&comment_id))
    }

    /// Records the target number of a newly created issue.
    ///
    /// An existing entry is never replaced; returns `false` in that case.
    pub fn record_issue(&mut self, repo_key: &str, number: u64, new_id: u64) -> bool {
        let issues = self.repos.entry(repo_key.to_string()).or_default();
        if issues.contains_key(&number) {
            return false;
        }
        issues.insert(number, IssueEntry::new(new_id));
        true
    }

    /// Records a newly created comment under its issue's entry.
    ///
    /// Returns `false` if the issue has no entry.
    pub fn record_comment(
        &mut self,
        repo_key: &str,
        number: u64,
        comment_id: u64,
        new_comment_id: u64,
    ) -> bool {
        match self
            .repos
            .get_mut(repo_key)
            .and_then(|issues| issues.get_mut(&number))
        {
            Some(entry) => {
                entry.comments.insert(comment_id, new_comment_id);
                true
            }
            None => false,
        }
    }

    /// Number of issues recorded for a repo key.
    #[must_use]
    pub fn issue_count(&self, repo_key: &str) -> usize {
        self.repos.get(repo_key).map_or(0, BTreeMap::len)
    }

    /// Returns the references already rewritten in a target issue.
    #[must_use]
    pub fn rewritten_links(&self, target_number: u64) -> Option<&BTreeSet<String>> {
        self.links.get(&target_number)
    }

    /// Records references rewritten in a target issue.
    pub fn record_links<I>(&mut self, target_number: u64, references: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.links
            .entry(target_number)
            .or_default()
            .extend(references);
    }
}
