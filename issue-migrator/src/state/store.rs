//! Durable storage for [`MigrationState`].

use super::{MigrationState, StateError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// State file used when neither `--state` nor the config names one.
pub const DEFAULT_STATE_FILE: &str = "migration-state.json";

/// Reads and writes the state file.
///
/// In dry-run mode [`StateStore::save`] never touches the disk, so repeated
/// dry runs start from the same state.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
    dry_run: bool,
}

impl StateStore {
    /// Creates a store for the given path.
    pub fn new(path: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            path: path.into(),
            dry_run,
        }
    }

    /// Returns the state file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns whether saves are suppressed.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Loads state from disk.
    ///
    /// Returns empty state when `clean` is set or no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if an existing file can't be read or parsed.
    pub fn load(&self, clean: bool) -> Result<MigrationState, StateError> {
        if clean {
            info!(path = %self.path.display(), "Starting from clean state");
            return Ok(MigrationState::default());
        }

        if !self.path.exists() {
            info!(path = %self.path.display(), "No state file yet, starting empty");
            return Ok(MigrationState::default());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let state = serde_json::from_str(&content).map_err(|e| StateError::ParseError {
            path: self.path.display().to_string(),
            source: e,
        })?;

        debug!(path = %self.path.display(), "Loaded state");
        Ok(state)
    }

    /// Writes state to disk, replacing the previous file atomically.
    ///
    /// Returns `false` without writing in dry-run mode.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if serialization or the write fails.
    pub fn save(&self, state: &MigrationState) -> Result<bool, StateError> {
        if self.dry_run {
            return Ok(false);
        }

        let json = serde_json::to_string_pretty(state)?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| self.io_error(e))?;
        file.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        debug!(path = %self.path.display(), "Saved state");
        Ok(true)
    }

    fn io_error(&self, source: std::io::Error) -> StateError {
        StateError::IoError {
            path: self.path.display().to_string(),
            source,
        }
    }
}
