#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod labels;
pub mod links;
pub mod mapping;
pub mod migrate;
pub mod rate_limit;
pub mod runner;
pub mod state;
pub mod summary;
pub mod templates;
pub mod tracker;

pub use config::{load_config, Config, ConfigError, RepoRef};
pub use labels::provision_labels;
pub use links::{compile_reference_pattern, LinkRewriter, ReferenceResolver};
pub use mapping::{map_labels, map_milestone, module_label, MilestoneMap};
pub use migrate::{load_milestones, CommentStatus, IssueStatus, MigrateError, MigrationJob, Migrator};
pub use rate_limit::{check_core_rate_limit, Pacer, RateLimitInfo};
pub use runner::{Mode, Overrides, Runner, RunnerConfig, RunnerError};
pub use state::{MigrationState, StateError, StateStore};
pub use summary::RunSummary;
pub use templates::{create_handlebars_registry, strip_attribution, TemplateError, TemplateRenderer};
pub use tracker::{IssueTracker, OctocrabTracker, TrackerError};
