//! Issue and comment migration.
//!
//! The [`Migrator`] walks the open issues of a source repository, least
//! recently updated first, and copies every issue and comment that the
//! [`MigrationState`] does not know about yet. State is saved after every
//! single write, so an interrupted run resumes where it stopped and loses at
//! most the one write that was in flight.
//!
//! If the process dies after an issue was created but before its number was
//! saved, the next run creates that issue again. Saving after each write
//! keeps that window as small as it can be without a second state write per
//! issue.

mod error;
mod status;

pub use error::MigrateError;
pub use status::{CommentStatus, IssueStatus};

use crate::config::RepoRef;
use crate::mapping::{map_labels, map_milestone, LabelMap, MilestoneMap};
use crate::rate_limit::Pacer;
use crate::state::{MigrationState, StateStore};
use crate::summary::RunSummary;
use crate::templates::TemplateRenderer;
use crate::tracker::{IssueTracker, NewIssue, RemoteIssue, TrackerError, PER_PAGE};
use tracing::{debug, info, info_span, Instrument};

/// One source repository to migrate into the target.
#[derive(Debug, Clone, Copy)]
pub struct MigrationJob<'a> {
    /// Internal repo key; names the state namespace and the module label.
    pub repo_key: &'a str,
    /// Source repository.
    pub source: &'a RepoRef,
    /// Target repository.
    pub target: &'a RepoRef,
    /// Label translation table for this source.
    pub label_map: &'a LabelMap,
    /// Target milestones by title.
    pub milestones: &'a MilestoneMap,
}

/// Fetches every milestone of `repo` into a [`MilestoneMap`].
///
/// # Errors
///
/// Returns [`TrackerError`] if a listing call fails.
pub async fn load_milestones<T: IssueTracker>(
    tracker: &T,
    repo: &RepoRef,
) -> Result<MilestoneMap, TrackerError> {
    let mut milestones = Vec::new();
    let mut page = 1;
    loop {
        let batch = tracker.list_milestones(repo, page).await?;
        let last = batch.len() < usize::from(PER_PAGE);
        milestones.extend(batch);
        if last {
            break;
        }
        page += 1;
    }

    debug!(repo = %repo, count = milestones.len(), "Loaded milestones");
    Ok(MilestoneMap::new(milestones))
}

/// Drives the migration of one source repository.
pub struct Migrator<'a, T: IssueTracker> {
    tracker: &'a T,
    store: &'a StateStore,
    renderer: TemplateRenderer,
    pacer: Pacer,
    dry_run: bool,
    oneshot: bool,
}

impl<'a, T: IssueTracker> Migrator<'a, T> {
    /// Creates a migrator. Dry-run mode follows the store.
    pub fn new(tracker: &'a T, store: &'a StateStore, pacer: Pacer) -> Self {
        Self {
            tracker,
            store,
            renderer: TemplateRenderer::new(),
            pacer,
            dry_run: store.dry_run(),
            oneshot: false,
        }
    }

    /// Stops after the first issue that needed any work.
    #[must_use]
    pub fn oneshot(mut self, oneshot: bool) -> Self {
        self.oneshot = oneshot;
        self
    }

    /// Returns the write pacer.
    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }

    /// Migrates all open issues of the job's source repository.
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError`] on the first failed API call or state write;
    /// everything written up to that point is already saved.
    pub async fn run(
        &mut self,
        job: &MigrationJob<'_>,
        state: &mut MigrationState,
    ) -> Result<RunSummary, MigrateError> {
        let mut summary = RunSummary::new(self.dry_run);
        info!(
            repo = job.repo_key,
            source = %job.source,
            target = %job.target,
            cached = state.issue_count(job.repo_key),
            dry_run = self.dry_run,
            "Starting migration"
        );

        let mut page = 1;
        'pages: loop {
            let issues = self.tracker.list_open_issues(job.source, page).await?;
            let last = issues.len() < usize::from(PER_PAGE);

            for issue in &issues {
                let span = info_span!("issue", repo = job.repo_key, number = issue.number);
                let worked = self
                    .migrate_issue(job, issue, state, &mut summary)
                    .instrument(span)
                    .await?;

                if self.oneshot && worked {
                    info!(number = issue.number, "Oneshot mode, stopping after one issue");
                    break 'pages;
                }
            }

            if last {
                break;
            }
            page += 1;
        }

        info!(
            created = summary.issues_created,
            cached = summary.issues_cached,
            comments = summary.comments_created,
            "Migration finished"
        );
        Ok(summary)
    }

    /// Processes one source issue. Returns whether it needed any work.
    async fn migrate_issue(
        &mut self,
        job: &MigrationJob<'_>,
        issue: &RemoteIssue,
        state: &mut MigrationState,
        summary: &mut RunSummary,
    ) -> Result<bool, MigrateError> {
        if issue.is_pull_request {
            report_issue(job, issue, &IssueStatus::SkippedPullRequest);
            summary.record_issue(&IssueStatus::SkippedPullRequest);
            return Ok(false);
        }

        let mut worked = false;
        let status = match state.new_id(job.repo_key, issue.number) {
            Some(number) => {
                let status = IssueStatus::Cached { number };
                report_issue(job, issue, &status);
                status
            }
            None => {
                worked = true;
                self.create_issue(job, issue, state, summary).await?
            }
        };
        summary.record_issue(&status);

        if issue.comments > 0 {
            let target_number = match status {
                IssueStatus::Created { number } | IssueStatus::Cached { number } => Some(number),
                _ => None,
            };
            worked |= self
                .migrate_comments(job, issue, target_number, state, summary)
                .await?;
        }

        Ok(worked)
    }

    /// Creates the target issue, or in dry-run only maps it.
    async fn create_issue(
        &mut self,
        job: &MigrationJob<'_>,
        issue: &RemoteIssue,
        state: &mut MigrationState,
        summary: &mut RunSummary,
    ) -> Result<IssueStatus, MigrateError> {
        let mapped = map_labels(job.repo_key, job.label_map, issue.labels.as_slice());
        summary.unmapped_labels.extend(mapped.unmapped);

        let milestone = map_milestone(issue.milestone.as_deref(), job.milestones);
        if let (Some(title), None) = (&issue.milestone, milestone) {
            summary.unmapped_milestones.insert(title.clone());
        }

        if self.dry_run {
            report_issue(job, issue, &IssueStatus::WouldCreate);
            println!(
                "    labels: {} milestone: {}",
                mapped.labels.join(", "),
                milestone.map_or_else(|| "-".to_string(), |number| number.to_string())
            );
            return Ok(IssueStatus::WouldCreate);
        }

        let new_issue = NewIssue {
            title: issue.title.clone(),
            body: self.renderer.render_issue_body(issue)?,
            labels: mapped.labels,
            milestone,
            assignee: issue.assignee.clone(),
        };
        let number = self.tracker.create_issue(job.target, &new_issue).await?;
        info!(new_id = number, "Issue created");

        state.record_issue(job.repo_key, issue.number, number);
        self.persist(state, summary)?;

        let status = IssueStatus::Created { number };
        report_issue(job, issue, &status);
        self.pacer.after_write().await;
        Ok(status)
    }

    /// Copies the comments missing from state. Returns whether any were missing.
    async fn migrate_comments(
        &mut self,
        job: &MigrationJob<'_>,
        issue: &RemoteIssue,
        target_number: Option<u64>,
        state: &mut MigrationState,
        summary: &mut RunSummary,
    ) -> Result<bool, MigrateError> {
        let mut worked = false;
        let mut page = 1;
        loop {
            let comments = self
                .tracker
                .list_comments(job.source, issue.number, page)
                .await?;
            let last = comments.len() < usize::from(PER_PAGE);

            for comment in &comments {
                let status = if state.has_comment(job.repo_key, issue.number, comment.id) {
                    CommentStatus::Cached
                } else {
                    worked = true;
                    match target_number.filter(|_| !self.dry_run) {
                        Some(target_number) => {
                            let body = self.renderer.render_comment_body(comment)?;
                            let id = self
                                .tracker
                                .create_comment(job.target, target_number, &body)
                                .await?;
                            info!(comment = comment.id, new_id = id, "Comment created");

                            state.record_comment(job.repo_key, issue.number, comment.id, id);
                            self.persist(state, summary)?;
                            self.pacer.after_write().await;
                            CommentStatus::Created { id }
                        }
                        None => CommentStatus::WouldCreate,
                    }
                };

                println!("    {} comment {}", status.marker(), comment.id);
                summary.record_comment(&status);
            }

            if last {
                break;
            }
            page += 1;
        }

        Ok(worked)
    }

    fn persist(&self, state: &MigrationState, summary: &mut RunSummary) -> Result<(), MigrateError> {
        if self.store.save(state)? {
            summary.state_saves += 1;
        }
        Ok(())
    }
}

fn report_issue(job: &MigrationJob<'_>, issue: &RemoteIssue, status: &IssueStatus) {
    match status {
        IssueStatus::Created { number } | IssueStatus::Cached { number } => println!(
            "{} {}#{} -> #{} {}",
            status.marker(),
            job.repo_key,
            issue.number,
            number,
            issue.title
        ),
        _ => println!(
            "{} {}#{} {}",
            status.marker(),
            job.repo_key,
            issue.number,
            issue.title
        ),
    }
}
