//! Label and milestone translation.
//!
//! Source labels are translated through a per-repo mapping table; source
//! milestones are matched by title against the target's milestones. Misses
//! are reported and dropped, never fatal.

use crate::config::LabelTargets;
use crate::tracker::Milestone;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Prefix of the synthetic label added to every migrated issue.
pub const MODULE_LABEL_PREFIX: &str = "module/";

/// Returns the synthetic `module/<repo_key>` label.
#[must_use]
pub fn module_label(repo_key: &str) -> String {
    format!("{MODULE_LABEL_PREFIX}{repo_key}")
}

/// Extracts the repo key from a `module/<repo_key>` label.
#[must_use]
pub fn repo_key_from_label(label: &str) -> Option<&str> {
    label
        .strip_prefix(MODULE_LABEL_PREFIX)
        .filter(|key| !key.is_empty())
}

/// Source label to target labels for one source repository.
pub type LabelMap = BTreeMap<String, LabelTargets>;

/// Milestone title to target milestone number.
#[derive(Debug, Clone, Default)]
pub struct MilestoneMap {
    by_title: HashMap<String, u64>,
}

impl MilestoneMap {
    /// Builds the map from the target repository's milestones.
    pub fn new<I>(milestones: I) -> Self
    where
        I: IntoIterator<Item = Milestone>,
    {
        Self {
            by_title: milestones
                .into_iter()
                .map(|milestone| (milestone.title, milestone.number))
                .collect(),
        }
    }

    /// Looks up a milestone number by title.
    #[must_use]
    pub fn get(&self, title: &str) -> Option<u64> {
        self.by_title.get(title).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}

/// Result of translating an issue's labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedLabels {
    /// Target labels, module label first, without duplicates.
    pub labels: Vec<String>,

    /// Source labels that had no mapping and were dropped.
    pub unmapped: Vec<String>,
}

/// Translates source labels to target labels.
///
/// The module label always comes first and appears exactly once.
#[must_use]
pub fn map_labels<S: AsRef<str>>(
    repo_key: &str,
    label_map: &LabelMap,
    labels: &[S],
) -> MappedLabels {
    let mut mapped = MappedLabels {
        labels: vec![module_label(repo_key)],
        unmapped: Vec::new(),
    };

    for label in labels {
        let label = label.as_ref();
        match label_map.get(label) {
            Some(targets) => {
                for target in targets.names() {
                    if !mapped.labels.contains(target) {
                        mapped.labels.push(target.clone());
                    }
                }
            }
            None => {
                warn!(repo = repo_key, label, "Unmapped label dropped");
                mapped.unmapped.push(label.to_string());
            }
        }
    }

    mapped
}

/// Translates a source milestone title to a target milestone number.
///
/// Returns `None` when there is no milestone or the title is unknown on
/// the target; the latter is logged.
#[must_use]
pub fn map_milestone(milestone: Option<&str>, milestones: &MilestoneMap) -> Option<u64> {
    let title = milestone?;
    let number = milestones.get(title);
    if number.is_none() {
        warn!(milestone = title, "Milestone not found on target, skipping");
    }
    number
}
