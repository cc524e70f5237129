mod common;

use common::{comment, fixtures_root, issue, FakeTracker};
use issue_migrator::{load_config, Mode, Overrides, Pacer, Runner, RunnerConfig, StateStore};
use std::path::Path;
use tempfile::TempDir;

fn runner_config(mode: Mode, state: &Path, dry_run: bool) -> RunnerConfig {
    let config = load_config(&fixtures_root().join("config.yml")).unwrap();
    let overrides = Overrides {
        state: Some(state.to_path_buf()),
        pause: Some(0),
        dry_run,
        ..Overrides::default()
    };
    RunnerConfig::resolve(mode, overrides, &config).unwrap()
}

fn migrate(repo_key: &str) -> Mode {
    Mode::Migrate {
        repo_key: repo_key.to_string(),
    }
}

fn source_tracker() -> FakeTracker {
    let mut crash = issue(7, "Crash on start", "It crashes.");
    crash.labels = vec!["bug".to_string()];
    FakeTracker::new()
        .with_milestone(1, "v1")
        .with_issue("acme/core", crash)
        .with_issue("acme/core", issue(8, "Crash again", "Duplicate of #7"))
        .with_comments("acme/core", 8, vec![comment(801, "Closing as dup of acme/core#7")])
}

#[tokio::test]
async fn migrate_then_rewrite_links() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("state.json");

    let migrate_runner = Runner::with_tracker(
        runner_config(migrate("core"), &state_path, false),
        source_tracker(),
    )
    .with_pacer(Pacer::immediate());
    let summary = migrate_runner.run().await.unwrap();

    assert_eq!(summary.issues_created, 2);
    assert_eq!(summary.comments_created, 1);
    assert_eq!(summary.state_saves, 3);

    let tracker = migrate_runner.tracker();
    let created = tracker.created_issues();
    assert_eq!(created[0].labels, vec!["module/core", "type/bug"]);
    assert_eq!(created[1].labels, vec!["module/core"]);

    let state = StateStore::new(&state_path, false).load(false).unwrap();
    assert_eq!(state.new_id("core", 7), Some(101));
    assert_eq!(state.new_id("core", 8), Some(102));

    // The link pass lists the target issues the migration just created.
    let links_runner = Runner::with_tracker(
        runner_config(Mode::Links, &state_path, false),
        migrate_runner.into_tracker(),
    )
    .with_pacer(Pacer::immediate());
    let summary = links_runner.run().await.unwrap();

    assert_eq!(summary.links_rewritten, 1);
    let body = links_runner.tracker().issue_body("acme/platform", 102).unwrap();
    assert!(body.ends_with("Duplicate of #101"));

    let state = StateStore::new(&state_path, false).load(false).unwrap();
    assert!(state.rewritten_links(102).unwrap().contains("#101"));
    assert_eq!(state.new_id("core", 7), Some(101));
}

#[tokio::test]
async fn dry_run_leaves_no_trace() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("state.json");

    let runner = Runner::with_tracker(
        runner_config(migrate("core"), &state_path, true),
        source_tracker(),
    )
    .with_pacer(Pacer::immediate());
    let summary = runner.run().await.unwrap();

    assert_eq!(summary.issues_would_create, 2);
    assert_eq!(summary.comments_would_create, 1);
    assert!(runner.tracker().calls().is_empty());
    assert!(!state_path.exists());
}

#[tokio::test]
async fn clean_ignores_existing_state() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join("state.json");

    let first = Runner::with_tracker(
        runner_config(migrate("core"), &state_path, false),
        source_tracker(),
    )
    .with_pacer(Pacer::immediate());
    first.run().await.unwrap();

    let config = load_config(&fixtures_root().join("config.yml")).unwrap();
    let overrides = Overrides {
        state: Some(state_path.clone()),
        clean: true,
        ..Overrides::default()
    };
    let second = Runner::with_tracker(
        RunnerConfig::resolve(migrate("core"), overrides, &config).unwrap(),
        first.into_tracker(),
    )
    .with_pacer(Pacer::immediate());
    let summary = second.run().await.unwrap();

    assert_eq!(summary.issues_created, 2);
    assert_eq!(summary.issues_cached, 0);
}

#[tokio::test]
async fn provisions_configured_labels() {
    let dir = TempDir::new().unwrap();
    let runner = Runner::with_tracker(
        runner_config(Mode::Labels, &dir.path().join("state.json"), false),
        FakeTracker::new().with_label("triage"),
    )
    .with_pacer(Pacer::immediate());

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.labels_created, 5);
    assert_eq!(summary.labels_updated, 1);
}

#[tokio::test]
async fn remote_failure_surfaces_as_runner_error() {
    let dir = TempDir::new().unwrap();
    let runner = Runner::with_tracker(
        runner_config(migrate("core"), &dir.path().join("state.json"), false),
        source_tracker().failing("create issue", 502),
    )
    .with_pacer(Pacer::immediate());

    let error = runner.run().await.unwrap_err();

    assert!(!error.is_config());
    assert!(error.rate_limit().is_none());
    assert!(error.to_string().contains("create issue"));
}
