//! Canonical label provisioning on the target repository.

use crate::config::RepoRef;
use crate::migrate::MigrateError;
use crate::rate_limit::Pacer;
use crate::summary::RunSummary;
use crate::tracker::{IssueTracker, TrackerError};
use tracing::{info, info_span, Instrument};

/// Creates or updates every label in `labels` (name, hex color) on `target`.
///
/// A label that already exists has its color updated instead. Only a failed
/// update, or a creation failure for any other reason, aborts the run.
///
/// # Errors
///
/// Returns [`MigrateError::Tracker`] on the first fatal API failure.
pub async fn provision_labels<T: IssueTracker>(
    tracker: &T,
    target: &RepoRef,
    labels: &[(String, String)],
    pacer: &mut Pacer,
    dry_run: bool,
) -> Result<RunSummary, MigrateError> {
    let mut summary = RunSummary::new(dry_run);
    info!(target = %target, count = labels.len(), "Provisioning labels");

    for (name, color) in labels {
        if dry_run {
            println!("[dry-run] label {name} #{color}");
            continue;
        }

        let span = info_span!("label", name = %name);
        async {
            match tracker.create_label(target, name, color).await {
                Ok(()) => {
                    println!("[created] label {name} #{color}");
                    summary.labels_created += 1;
                }
                Err(e) if e.is_already_exists() => {
                    info!("Label exists, updating color");
                    tracker.update_label(target, name, color).await?;
                    println!("[updated] label {name} #{color}");
                    summary.labels_updated += 1;
                }
                Err(e) => return Err(e),
            }
            pacer.after_write().await;
            Ok::<(), TrackerError>(())
        }
        .instrument(span)
        .await?;
    }

    Ok(summary)
}
