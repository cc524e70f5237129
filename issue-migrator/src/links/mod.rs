//! Post-migration link rewriting.
//!
//! Migrated bodies still point at source issue numbers. This pass walks the
//! open issues of the target repository and rewrites references such as
//! `acme/core#7` or a bare `#7` to the number the referenced issue received
//! on the target.

mod reference;

pub use reference::{
    compile_reference_pattern, ReferenceResolver, Replacement, Rewrite,
    DEFAULT_REFERENCE_PATTERN,
};

use crate::config::RepoRef;
use crate::mapping::repo_key_from_label;
use crate::migrate::MigrateError;
use crate::rate_limit::Pacer;
use crate::state::{MigrationState, StateStore};
use crate::summary::RunSummary;
use crate::tracker::{IssueTracker, RemoteIssue, PER_PAGE};
use regex::Regex;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Rewrites cross-issue references in target issue bodies.
pub struct LinkRewriter<'a, T: IssueTracker> {
    tracker: &'a T,
    store: &'a StateStore,
    pacer: Pacer,
    pattern: Regex,
    repo_keys: BTreeMap<String, String>,
    dry_run: bool,
}

impl<'a, T: IssueTracker> LinkRewriter<'a, T> {
    /// Creates a rewriter. `repo_keys` maps lowercased `owner/name` to repo keys.
    pub fn new(
        tracker: &'a T,
        store: &'a StateStore,
        pacer: Pacer,
        pattern: Regex,
        repo_keys: BTreeMap<String, String>,
    ) -> Self {
        Self {
            tracker,
            store,
            pacer,
            pattern,
            repo_keys,
            dry_run: store.dry_run(),
        }
    }

    /// Rewrites references in every open issue of `target`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError`] on the first failed API call or state write.
    pub async fn run(
        &mut self,
        target: &RepoRef,
        state: &mut MigrationState,
    ) -> Result<RunSummary, MigrateError> {
        let mut summary = RunSummary::new(self.dry_run);
        info!(target = %target, "Rewriting issue references");

        // Rewriting bumps an issue's update time and reorders the listing,
        // so every page is fetched before the first edit.
        let mut issues = Vec::new();
        let mut page = 1;
        loop {
            let batch = self.tracker.list_open_issues(target, page).await?;
            let last = batch.len() < usize::from(PER_PAGE);
            issues.extend(batch.into_iter().filter(|issue| !issue.is_pull_request));

            if last {
                break;
            }
            page += 1;
        }
        debug!(count = issues.len(), "Listed target issues");

        for issue in &issues {
            self.rewrite_issue(target, issue, state, &mut summary)
                .await?;
        }

        info!(rewritten = summary.links_rewritten, "Link rewriting finished");
        Ok(summary)
    }

    async fn rewrite_issue(
        &mut self,
        target: &RepoRef,
        issue: &RemoteIssue,
        state: &mut MigrationState,
        summary: &mut RunSummary,
    ) -> Result<(), MigrateError> {
        if !self.pattern.is_match(&issue.body) {
            return Ok(());
        }

        let default_repo = issue
            .labels
            .iter()
            .find_map(|label| repo_key_from_label(label));
        let rewrite = ReferenceResolver {
            repo_keys: &self.repo_keys,
            default_repo,
            state,
            already_rewritten: state.rewritten_links(issue.number),
        }
        .rewrite(&self.pattern, &issue.body);

        if !rewrite.changed() {
            debug!(number = issue.number, "No resolvable references");
            return Ok(());
        }

        let marker = if self.dry_run { "[dry-run]" } else { "[rewrote]" };
        for replacement in &rewrite.replacements {
            println!(
                "{marker} #{}: {} -> {}",
                issue.number, replacement.from, replacement.to
            );
        }

        if self.dry_run {
            return Ok(());
        }

        self.tracker
            .update_issue_body(target, issue.number, &rewrite.body)
            .await?;
        state.record_links(
            issue.number,
            rewrite.replacements.into_iter().map(|r| r.to),
        );
        if self.store.save(state)? {
            summary.state_saves += 1;
        }
        summary.links_rewritten += 1;
        self.pacer.after_write().await;

        Ok(())
    }
}
