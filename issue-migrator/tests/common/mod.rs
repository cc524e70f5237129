//! In-memory issue tracker shared by the integration tests.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use issue_migrator::tracker::{
    Author, IssueTracker, Milestone, NewIssue, RemoteComment, RemoteIssue, TrackerError, PER_PAGE,
};
use issue_migrator::RepoRef;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Mutex;

pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn repo(full_name: &str) -> RepoRef {
    RepoRef::parse(full_name).unwrap()
}

pub fn author(login: &str) -> Author {
    Author {
        login: login.to_string(),
        avatar_url: format!("https://avatars.example.com/{login}"),
    }
}

pub fn issue(number: u64, title: &str, body: &str) -> RemoteIssue {
    RemoteIssue {
        number,
        title: title.to_string(),
        body: body.to_string(),
        author: author("alice"),
        html_url: format!("https://github.com/acme/core/issues/{number}"),
        created_at: Utc.with_ymd_and_hms(2023, 5, 17, 9, 30, 0).unwrap(),
        assignee: None,
        milestone: None,
        labels: Vec::new(),
        comments: 0,
        is_pull_request: false,
    }
}

pub fn comment(id: u64, body: &str) -> RemoteComment {
    RemoteComment {
        id,
        body: body.to_string(),
        author: author("bob"),
        html_url: format!("https://github.com/acme/core/issues/1#issuecomment-{id}"),
        created_at: Utc.with_ymd_and_hms(2023, 5, 18, 12, 0, 0).unwrap(),
    }
}

/// A write the tracker received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateIssue { repo: String, issue: NewIssue },
    CreateComment { repo: String, number: u64, body: String },
    UpdateBody { repo: String, number: u64, body: String },
    CreateLabel { name: String, color: String },
    UpdateLabel { name: String, color: String },
}

#[derive(Default)]
struct Inner {
    issues: BTreeMap<String, Vec<RemoteIssue>>,
    comments: BTreeMap<(String, u64), Vec<RemoteComment>>,
    milestones: Vec<Milestone>,
    labels: BTreeSet<String>,
    next_number: u64,
    next_comment_id: u64,
    calls: Vec<Call>,
    fail: BTreeMap<&'static str, u16>,
    move_updated_to_end: bool,
}

/// Tracker backed by in-memory repositories.
///
/// Created issues are appended to the target listing so that later passes
/// see them.
#[derive(Default)]
pub struct FakeTracker {
    inner: Mutex<Inner>,
}

impl FakeTracker {
    pub fn new() -> Self {
        let tracker = Self::default();
        {
            let mut inner = tracker.inner.lock().unwrap();
            inner.next_number = 100;
            inner.next_comment_id = 9000;
        }
        tracker
    }

    pub fn with_issue(self, repo: &str, issue: RemoteIssue) -> Self {
        self.inner
            .lock()
            .unwrap()
            .issues
            .entry(repo.to_string())
            .or_default()
            .push(issue);
        self
    }

    pub fn with_comments(self, repo: &str, number: u64, comments: Vec<RemoteComment>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let count = comments.len() as u32;
            if let Some(issue) = inner
                .issues
                .get_mut(repo)
                .and_then(|issues| issues.iter_mut().find(|issue| issue.number == number))
            {
                issue.comments = count;
            }
            inner.comments.insert((repo.to_string(), number), comments);
        }
        self
    }

    pub fn with_milestone(self, number: u64, title: &str) -> Self {
        self.inner.lock().unwrap().milestones.push(Milestone {
            number,
            title: title.to_string(),
        });
        self
    }

    pub fn with_label(self, name: &str) -> Self {
        self.inner.lock().unwrap().labels.insert(name.to_string());
        self
    }

    /// Lists issues by update time: an edited issue moves to the end.
    pub fn ordered_by_update(self) -> Self {
        self.inner.lock().unwrap().move_updated_to_end = true;
        self
    }

    /// Makes every call of `action` fail with `status`.
    pub fn failing(self, action: &'static str, status: u16) -> Self {
        self.inner.lock().unwrap().fail.insert(action, status);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn created_issues(&self) -> Vec<NewIssue> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateIssue { issue, .. } => Some(issue),
                _ => None,
            })
            .collect()
    }

    pub fn created_comments(&self) -> Vec<(u64, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateComment { number, body, .. } => Some((number, body)),
                _ => None,
            })
            .collect()
    }

    pub fn issue_body(&self, repo: &str, number: u64) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .issues
            .get(repo)?
            .iter()
            .find(|issue| issue.number == number)
            .map(|issue| issue.body.clone())
    }

    fn check(inner: &Inner, action: &'static str) -> Result<(), TrackerError> {
        match inner.fail.get(action) {
            Some(status) => Err(TrackerError::Api {
                action: action.to_string(),
                status: Some(*status),
                message: format!("{action} rejected"),
                rate_limit: None,
            }),
            None => Ok(()),
        }
    }
}

fn page_of<T: Clone>(items: &[T], page: u32) -> Vec<T> {
    let per_page = usize::from(PER_PAGE);
    let start = (page.max(1) as usize - 1) * per_page;
    items.iter().skip(start).take(per_page).cloned().collect()
}

impl IssueTracker for FakeTracker {
    async fn list_open_issues(
        &self,
        repo: &RepoRef,
        page: u32,
    ) -> Result<Vec<RemoteIssue>, TrackerError> {
        let inner = self.inner.lock().unwrap();
        Self::check(&inner, "list issues")?;
        let issues = inner
            .issues
            .get(&repo.full_name())
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(page_of(issues, page))
    }

    async fn list_comments(
        &self,
        repo: &RepoRef,
        number: u64,
        page: u32,
    ) -> Result<Vec<RemoteComment>, TrackerError> {
        let inner = self.inner.lock().unwrap();
        Self::check(&inner, "list comments")?;
        let comments = inner
            .comments
            .get(&(repo.full_name(), number))
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(page_of(comments, page))
    }

    async fn list_milestones(
        &self,
        _repo: &RepoRef,
        page: u32,
    ) -> Result<Vec<Milestone>, TrackerError> {
        let inner = self.inner.lock().unwrap();
        Self::check(&inner, "list milestones")?;
        Ok(page_of(&inner.milestones, page))
    }

    async fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<u64, TrackerError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner, "create issue")?;

        inner.next_number += 1;
        let number = inner.next_number;
        let mut created = self::issue(number, &issue.title, &issue.body);
        created.labels = issue.labels.clone();
        inner
            .issues
            .entry(repo.full_name())
            .or_default()
            .push(created);
        inner.calls.push(Call::CreateIssue {
            repo: repo.full_name(),
            issue: issue.clone(),
        });
        Ok(number)
    }

    async fn create_comment(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<u64, TrackerError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner, "create comment")?;

        inner.next_comment_id += 1;
        let id = inner.next_comment_id;
        inner.calls.push(Call::CreateComment {
            repo: repo.full_name(),
            number,
            body: body.to_string(),
        });
        Ok(id)
    }

    async fn update_issue_body(
        &self,
        repo: &RepoRef,
        number: u64,
        body: &str,
    ) -> Result<(), TrackerError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner, "update issue")?;

        let move_to_end = inner.move_updated_to_end;
        if let Some(issues) = inner.issues.get_mut(&repo.full_name()) {
            if let Some(index) = issues.iter().position(|issue| issue.number == number) {
                issues[index].body = body.to_string();
                if move_to_end {
                    let updated = issues.remove(index);
                    issues.push(updated);
                }
            }
        }
        inner.calls.push(Call::UpdateBody {
            repo: repo.full_name(),
            number,
            body: body.to_string(),
        });
        Ok(())
    }

    async fn create_label(
        &self,
        _repo: &RepoRef,
        name: &str,
        color: &str,
    ) -> Result<(), TrackerError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner, "create label")?;

        if !inner.labels.insert(name.to_string()) {
            return Err(TrackerError::Api {
                action: "create label".to_string(),
                status: Some(422),
                message: "Validation Failed".to_string(),
                rate_limit: None,
            });
        }
        inner.calls.push(Call::CreateLabel {
            name: name.to_string(),
            color: color.to_string(),
        });
        Ok(())
    }

    async fn update_label(
        &self,
        _repo: &RepoRef,
        name: &str,
        color: &str,
    ) -> Result<(), TrackerError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner, "update label")?;

        inner.calls.push(Call::UpdateLabel {
            name: name.to_string(),
            color: color.to_string(),
        });
        Ok(())
    }
}
