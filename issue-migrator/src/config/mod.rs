//! Configuration loading.
//!
//! This module handles parsing the YAML configuration file and the
//! `owner/name` repository references it contains.

mod error;
mod file;
mod repo_ref;

pub use error::ConfigError;
pub use file::{AuthConfig, Config, LabelTargets, RepoConfig};
pub use repo_ref::RepoRef;

use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the configuration file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yml";

/// Returns the default configuration path.
///
/// Prefers `config.yml` next to the running executable and falls back to
/// `config.yml` in the working directory.
#[must_use]
pub fn default_config_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_CONFIG_FILE)))
        .filter(|path| path.exists())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Loads the configuration file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is missing or can't be parsed.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    info!(path = %path.display(), "Loading configuration");
    Config::load(path)
}
