//! CLI for the Issue Migrator.
//!
//! Copies open issues and comments from configured source repositories into
//! a target repository, provisions labels, and rewrites cross-issue links.

use clap::{ArgGroup, Parser};
use issue_migrator::config::default_config_path;
use issue_migrator::{load_config, Mode, Overrides, RunSummary, Runner, RunnerConfig, RunnerError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Issue Migrator - Move open GitHub issues and their comments between repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["repo", "labels", "links"])))]
struct Args {
    /// Path to the YAML config file [default: config.yml next to the executable, else ./config.yml].
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long)]
    debug: bool,

    /// Create or update the configured labels on the target repository.
    #[arg(long)]
    labels: bool,

    /// Migrate the open issues of the source repository with this key.
    #[arg(long, value_name = "KEY")]
    repo: Option<String>,

    /// Rewrite cross-issue references in target issues.
    #[arg(long)]
    links: bool,

    /// Stop after the first issue that needed work.
    #[arg(long)]
    oneshot: bool,

    /// Target repository (owner/name).
    #[arg(long)]
    target: Option<String>,

    /// User for basic authentication.
    #[arg(long)]
    user: Option<String>,

    /// GitHub Personal Access Token [env: GITHUB_TOKEN].
    #[arg(long)]
    token: Option<String>,

    /// Preview changes without writing anything.
    #[arg(long)]
    dry_run: bool,

    /// Ignore the existing state file.
    #[arg(long)]
    clean: bool,

    /// Path to the state file.
    #[arg(long)]
    state: Option<PathBuf>,

    /// Seconds to pause after each write.
    #[arg(long, value_name = "SECONDS")]
    pause: Option<u64>,
}

impl Args {
    fn mode(&self) -> Mode {
        match &self.repo {
            Some(repo_key) => Mode::Migrate {
                repo_key: repo_key.clone(),
            },
            None if self.labels => Mode::Labels,
            None => Mode::Links,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // octocrab pulls in rustls; pick the provider before any client exists.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    init_tracing(args.debug);

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.rate_limit() {
                Some(rate_limit) => error!(
                    error = %e,
                    limit = rate_limit.limit,
                    remaining = rate_limit.remaining,
                    reset = rate_limit.reset,
                    "Migration aborted"
                ),
                None => error!(error = %e, "Migration aborted"),
            }
            if e.is_config() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// `RUST_LOG` controls the level and defaults to "info"; `--debug` forces
/// "debug" regardless.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(filter)
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let file = load_config(&config_path)?;

    let mode = args.mode();
    let overrides = Overrides {
        target: args.target,
        user: args.user,
        token: args.token,
        state: args.state,
        pause: args.pause,
        dry_run: args.dry_run,
        clean: args.clean,
        oneshot: args.oneshot,
    };

    let config = RunnerConfig::resolve(mode, overrides, &file)?;
    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Issues created: {}", summary.issues_created);
    println!("  Issues already migrated: {}", summary.issues_cached);
    println!("  Pull requests skipped: {}", summary.pull_requests_skipped);
    println!("  Comments created: {}", summary.comments_created);
    println!("  Comments already migrated: {}", summary.comments_cached);

    if summary.dry_run {
        println!("  Issues that would be created: {}", summary.issues_would_create);
        println!(
            "  Comments that would be created: {}",
            summary.comments_would_create
        );
    }

    if summary.labels_created + summary.labels_updated > 0 {
        println!("  Labels created: {}", summary.labels_created);
        println!("  Labels updated: {}", summary.labels_updated);
    }
    if summary.links_rewritten > 0 {
        println!("  Issues with rewritten links: {}", summary.links_rewritten);
    }
    println!("  State saves: {}", summary.state_saves);

    if summary.has_mapping_misses() {
        if !summary.unmapped_labels.is_empty() {
            let labels: Vec<&str> = summary.unmapped_labels.iter().map(String::as_str).collect();
            println!("  Unmapped labels: {}", labels.join(", "));
        }
        if !summary.unmapped_milestones.is_empty() {
            let milestones: Vec<&str> =
                summary.unmapped_milestones.iter().map(String::as_str).collect();
            println!("  Unmapped milestones: {}", milestones.join(", "));
        }
    }
}
