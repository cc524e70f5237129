//! Migration error types.

use crate::state::StateError;
use crate::templates::TemplateError;
use crate::tracker::TrackerError;
use thiserror::Error;

/// Errors that abort a migration, label or link run.
///
/// None of these are retried: state is saved after every write, so the
/// operator re-invokes the tool once the cause is gone.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Remote API call failed.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// State could not be persisted.
    #[error(transparent)]
    State(#[from] StateError),

    /// Body rendering failed.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
