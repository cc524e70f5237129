//! GitHub implementation of [`IssueTracker`] using octocrab.

use super::{
    Author, IssueTracker, Milestone, NewIssue, RemoteComment, RemoteIssue, TrackerError, PER_PAGE,
};
use crate::config::RepoRef;
use crate::rate_limit::check_core_rate_limit;
use octocrab::params;
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Production tracker backed by the GitHub REST API.
#[derive(Clone)]
pub struct OctocrabTracker {
    octocrab: Octocrab,
}

/// Query string for the milestones listing.
#[derive(Serialize)]
struct MilestoneQuery {
    state: &'static str,
    per_page: u8,
    page: u32,
}

/// The subset of the milestone resource we read.
#[derive(Deserialize)]
struct MilestoneRecord {
    number: u64,
    title: String,
}

impl OctocrabTracker {
    /// Builds an authenticated client.
    ///
    /// With a `user`, the token is sent as the basic-auth password; otherwise
    /// it is used as a bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client can't be constructed.
    pub fn new(token: &str, user: Option<&str>) -> Result<Self, octocrab::Error> {
        let builder = Octocrab::builder();
        let octocrab = match user {
            Some(user) => builder
                .basic_auth(user.to_string(), token.to_string())
                .build()?,
            None => builder.personal_token(token.to_string()).build()?,
        };
        Ok(Self { octocrab })
    }

    /// Wraps an octocrab error, attaching the current core rate limit.
    async fn api_error(&self, action: &str, error: octocrab::Error) -> TrackerError {
        let (status, message) = match &error {
            octocrab::Error::GitHub { source, .. } => {
                (Some(source.status_code.as_u16()), source.message.clone())
            }
            other => (None, other.to_string()),
        };

        let rate_limit = match check_core_rate_limit(&self.octocrab).await {
            Ok(info) => Some(info),
            Err(e) => {
                warn!(error = %e, "Could not fetch rate limit after failure");
                None
            }
        };

        TrackerError::Api {
            action: action.to_string(),
            status,
            message,
            rate_limit,
        }
    }
}

impl IssueTracker for OctocrabTracker {
    async fn list_open_issues(
        &self,
        repo: &RepoRef,
        page: u32,
    ) -> Result<Vec<RemoteIssue>, TrackerError> {
        debug!(repo = %repo, page, "Listing open issues");
        let result = self
            .octocrab
            .issues(&repo.owner, &repo.name)
            .list()
            .state(params::State::Open)
            .sort(params::issues::Sort::Updated)
            .direction(params::Direction::Ascending)
            .per_page(PER_PAGE)
            .page(page)
            .send()
            .await;

        match result {
            Ok(page) => Ok(page.items.iter().map(convert_issue).collect()),
            Err(e) => Err(self.api_error("list issues", e).await),
        }
    }

    async fn list_comments(
        &self,
        repo: &RepoRef,
        number: u64,
        page: u32,
    ) -> Result<Vec<RemoteComment>, TrackerError> {
        debug!(repo = %repo, issue = number, page, "Listing comments");
        let result = self
            .octocrab
            .issues(&repo.owner, &repo.name)
            .list_comments(number)
            .per_page(PER_PAGE)
            .page(page)
            .send()
            .await;

        match result {
            Ok(page) => Ok(page.items.iter().map(convert_comment).collect()),
            Err(e) => Err(self.api_error("list comments", e).await),
        }
    }

    async fn list_milestones(
        &self,
        repo: &RepoRef,
        page: u32,
    ) -> Result<Vec<Milestone>, TrackerError> {
        let route = format!("/repos/{}/{}/milestones", repo.owner, repo.name);
        let query = MilestoneQuery {
            state: "all",
            per_page: PER_PAGE,
            page,
        };

        match self
            .octocrab
            .get::<Vec<MilestoneRecord>, _, _>(route, Some(&query))
            .await
        {
            Ok(records) => Ok(records
                .into_iter()
                .map(|record| Milestone {
                    number: record.number,
                    title: record.title,
                })
                .collect()),
            Err(e) => Err(self.api_error("list milestones", e).await),
        }
    }

    async fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<u64, TrackerError> {
        let issues = self.octocrab.issues(&repo.owner, &repo.name);
        let mut builder = issues
            .create(&issue.title)
            .body(&issue.body)
            .labels(issue.labels.clone());
        if let Some(milestone) = issue.milestone {
            builder = builder.milestone(milestone);
        }
        if let Some(assignee) = &issue.assignee {
            builder = builder.assignees(vec![assignee.clone()]);
        }

        match builder.send().await {
            Ok(created) => Ok(created.number),
            Err(e) => Err(self.api_error("create issue", e).await),
        }
    }

    async fn create_comment(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<u64, TrackerError> {
        match self
            .octocrab
            .issues(&repo.owner, &repo.name)
            .create_comment(number, body)
            .await
        {
            Ok(comment) => Ok(comment.id.0),
            Err(e) => Err(self.api_error("create comment", e).await),
        }
    }

    async fn update_issue_body(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<(), TrackerError> {
        match self
            .octocrab
            .issues(&repo.owner, &repo.name)
            .update(number)
            .body(body)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => Err(self.api_error("update issue", e).await),
        }
    }

    async fn create_label(&self, repo: &RepoRef, name: &str, color: &str) -> Result<(), TrackerError> {
        match self
            .octocrab
            .issues(&repo.owner, &repo.name)
            .create_label(name, color, "")
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => Err(self.api_error("create label", e).await),
        }
    }

    async fn update_label(&self, repo: &RepoRef, name: &str, color: &str) -> Result<(), TrackerError> {
        let route = format!(
            "/repos/{}/{}/labels/{}",
            repo.owner,
            repo.name,
            encode_path_segment(name)
        );
        let body = serde_json::json!({ "color": color });

        match self
            .octocrab
            .patch::<serde_json::Value, _, _>(route, Some(&body))
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => Err(self.api_error("update label", e).await),
        }
    }
}

fn convert_author(user: &octocrab::models::Author) -> Author {
    Author {
        login: user.login.clone(),
        avatar_url: user.avatar_url.to_string(),
    }
}

fn convert_issue(issue: &octocrab::models::issues::Issue) -> RemoteIssue {
    RemoteIssue {
        number: issue.number,
        title: issue.title.clone(),
        body: issue.body.clone().unwrap_or_default(),
        author: convert_author(&issue.user),
        html_url: issue.html_url.to_string(),
        created_at: issue.created_at,
        assignee: issue.assignee.as_ref().map(|a| a.login.clone()),
        milestone: issue.milestone.as_ref().map(|m| m.title.clone()),
        labels: issue.labels.iter().map(|l| l.name.clone()).collect(),
        comments: issue.comments,
        is_pull_request: issue.pull_request.is_some(),
    }
}

fn convert_comment(comment: &octocrab::models::issues::Comment) -> RemoteComment {
    RemoteComment {
        id: comment.id.0,
        body: comment.body.clone().unwrap_or_default(),
        author: convert_author(&comment.user),
        html_url: comment.html_url.to_string(),
        created_at: comment.created_at,
    }
}

/// Percent-encodes a label name for use as a single path segment.
fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_names_are_percent_encoded() {
        assert_eq!(encode_path_segment("module/core"), "module%2Fcore");
        assert_eq!(encode_path_segment("good first issue"), "good%20first%20issue");
        assert_eq!(encode_path_segment("bug"), "bug");
        assert_eq!(encode_path_segment("prio: high"), "prio%3A%20high");
        assert_eq!(encode_path_segment("größe"), "gr%C3%B6%C3%9Fe");
    }
}
