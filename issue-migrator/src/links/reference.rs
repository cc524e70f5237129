//! Cross-issue reference matching and rewriting.

use crate::config::ConfigError;
use crate::state::MigrationState;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};

/// Default reference grammar.
///
/// A reference starts the text or follows whitespace, `(` or `[`, may carry
/// an `owner/name` prefix, and ends at a non-word character after the
/// digits. `lead` captures the preceding character so it can be kept.
pub const DEFAULT_REFERENCE_PATTERN: &str =
    r"(?P<lead>^|[\s(\[])(?:(?P<repo>[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+))?#(?P<number>[0-9]+)\b";

/// Compiles a reference pattern, falling back to [`DEFAULT_REFERENCE_PATTERN`].
///
/// Custom patterns must define a `number` group and may define `repo` and
/// `lead` groups with the same meaning as the default.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidPattern`] if the pattern does not compile
/// or has no `number` group.
pub fn compile_reference_pattern(pattern: Option<&str>) -> Result<Regex, ConfigError> {
    let pattern = pattern.unwrap_or(DEFAULT_REFERENCE_PATTERN);
    let invalid = |message: String| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        message,
    };

    let regex = Regex::new(pattern).map_err(|e| invalid(e.to_string()))?;
    if !regex.capture_names().flatten().any(|name| name == "number") {
        return Err(invalid("missing named group 'number'".to_string()));
    }
    Ok(regex)
}

/// A single rewritten reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Reference as it appeared, e.g. `acme/core#7`.
    pub from: String,
    /// Reference written in its place, e.g. `#107`.
    pub to: String,
}

/// Result of rewriting one body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub body: String,
    pub replacements: Vec<Replacement>,
}

impl Rewrite {
    /// Returns whether anything was rewritten.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.replacements.is_empty()
    }
}

/// Everything needed to resolve references in one target issue.
pub struct ReferenceResolver<'a> {
    /// Lowercased `owner/name` to repo key.
    pub repo_keys: &'a BTreeMap<String, String>,
    /// Repo key of the issue itself, from its module label.
    pub default_repo: Option<&'a str>,
    /// Source number to target number translation.
    pub state: &'a MigrationState,
    /// References written by earlier passes over this issue.
    pub already_rewritten: Option<&'a BTreeSet<String>>,
}

impl ReferenceResolver<'_> {
    /// Rewrites every resolvable reference in `body` to `#<target number>`.
    ///
    /// References are left unchanged when their repo is unknown, the source
    /// issue was never migrated, or they were written by an earlier pass.
    #[must_use]
    pub fn rewrite(&self, pattern: &Regex, body: &str) -> Rewrite {
        let mut replacements = Vec::new();
        let rewritten = pattern.replace_all(body, |caps: &Captures<'_>| {
            let whole = &caps[0];
            let start = caps.get(0).map_or(0, |m| m.start());
            // A lead only counts when it prefixes the match.
            let split = caps
                .name("lead")
                .filter(|m| m.start() == start)
                .map_or(0, |m| m.end() - start);
            let (lead, reference) = whole.split_at(split);

            match self.resolve(caps, reference) {
                Some(to) => {
                    replacements.push(Replacement {
                        from: reference.to_string(),
                        to: to.clone(),
                    });
                    format!("{lead}{to}")
                }
                None => whole.to_string(),
            }
        });

        Rewrite {
            body: rewritten.into_owned(),
            replacements,
        }
    }

    fn resolve(&self, caps: &Captures<'_>, reference: &str) -> Option<String> {
        if self
            .already_rewritten
            .is_some_and(|done| done.contains(reference))
        {
            return None;
        }

        let repo_key = match caps.name("repo") {
            Some(repo) => self.repo_keys.get(&repo.as_str().to_lowercase())?.as_str(),
            None => self.default_repo?,
        };
        let number: u64 = caps.name("number")?.as_str().parse().ok()?;
        let new_id = self.state.new_id(repo_key, number)?;

        Some(format!("#{new_id}"))
    }
}
