//! YAML configuration file deserialization.

use super::{ConfigError, RepoRef};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parsed contents of `config.yml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Credentials for the issue tracker.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Default target repository (`owner/name`).
    pub target: Option<String>,

    /// Source repositories keyed by their internal repo key.
    #[serde(default)]
    pub repos: BTreeMap<String, RepoConfig>,

    /// Canonical target labels: name to hex color.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// State file path.
    pub state: Option<PathBuf>,

    /// Overrides the reference pattern used when rewriting links.
    pub link_pattern: Option<String>,
}

/// The `auth` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    pub user: Option<String>,
    pub token: Option<String>,
}

/// A single entry under `repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoConfig {
    /// Source repository (`owner/name`).
    pub name: String,

    /// Source label name to one or more target label names.
    #[serde(default)]
    pub label_mapping: BTreeMap<String, LabelTargets>,

    /// Other `owner/name` spellings that references to this repo may use.
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// Right-hand side of a label mapping entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LabelTargets {
    One(String),
    Many(Vec<String>),
}

impl LabelTargets {
    /// Returns the mapped target label names.
    #[must_use]
    pub fn names(&self) -> &[String] {
        match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }
}

impl Config {
    /// Loads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable or not valid YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading config");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parses configuration from a YAML string. `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::YamlError`] if the content is not valid YAML.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::YamlError {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Looks up a source repository by key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRepo`] for keys not under `repos`.
    pub fn repo(&self, key: &str) -> Result<&RepoConfig, ConfigError> {
        self.repos.get(key).ok_or_else(|| ConfigError::UnknownRepo {
            key: key.to_string(),
        })
    }

    /// Builds the reverse lookup from referenced repo names to repo keys.
    ///
    /// Names are lowercased. Every configured `name` and alias must be a
    /// valid `owner/name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRepoRef`] on the first malformed name.
    pub fn repo_keys_by_name(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut lookup = BTreeMap::new();
        for (key, repo) in &self.repos {
            for name in std::iter::once(&repo.name).chain(&repo.aliases) {
                let repo_ref = RepoRef::parse(name)?;
                lookup.insert(repo_ref.full_name().to_lowercase(), key.clone());
            }
        }
        Ok(lookup)
    }

    /// Returns the configured labels with normalized colors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingLabels`] if none are configured, or
    /// [`ConfigError::InvalidColor`] for a malformed color.
    pub fn label_colors(&self) -> Result<Vec<(String, String)>, ConfigError> {
        if self.labels.is_empty() {
            return Err(ConfigError::MissingLabels);
        }

        self.labels
            .iter()
            .map(|(name, color)| Ok((name.clone(), normalize_color(name, color)?)))
            .collect()
    }
}

/// Strips a leading `#` and lowercases a 6-digit hex color.
fn normalize_color(label: &str, color: &str) -> Result<String, ConfigError> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(hex.to_ascii_lowercase())
    } else {
        Err(ConfigError::InvalidColor {
            label: label.to_string(),
            color: color.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
auth:
  user: octocat
  token: secret
target: acme/platform
repos:
  core:
    name: acme/core
    aliases: [acme/core-legacy]
    label_mapping:
      bug: type/bug
      question: [type/question, triage]
labels:
  type/bug: "#D73A4A"
  triage: ededed
"##;

    fn sample() -> Config {
        Config::parse(SAMPLE, Path::new("config.yml")).unwrap()
    }

    #[test]
    fn can_parse_full_config() {
        let config = sample();

        assert_eq!(config.auth.user.as_deref(), Some("octocat"));
        assert_eq!(config.target.as_deref(), Some("acme/platform"));
        assert!(config.state.is_none());

        let core = config.repo("core").unwrap();
        assert_eq!(core.name, "acme/core");
        assert_eq!(core.label_mapping["bug"].names(), ["type/bug"]);
        assert_eq!(
            core.label_mapping["question"].names(),
            ["type/question", "triage"]
        );
    }

    #[test]
    fn unknown_repo_key_is_an_error() {
        let config = sample();
        let result = config.repo("missing");
        assert!(matches!(result, Err(ConfigError::UnknownRepo { key }) if key == "missing"));
    }

    #[test]
    fn reverse_lookup_includes_aliases() {
        let lookup = sample().repo_keys_by_name().unwrap();
        assert_eq!(lookup.get("acme/core").map(String::as_str), Some("core"));
        assert_eq!(
            lookup.get("acme/core-legacy").map(String::as_str),
            Some("core")
        );
        assert!(!lookup.contains_key("acme/widgets"));
    }

    #[test]
    fn reverse_lookup_rejects_malformed_names() {
        let mut config = sample();
        config.repos.get_mut("core").unwrap().name = "core".to_string();
        assert!(matches!(
            config.repo_keys_by_name(),
            Err(ConfigError::InvalidRepoRef { .. })
        ));
    }

    #[test]
    fn label_colors_are_normalized() {
        let colors = sample().label_colors().unwrap();
        assert_eq!(
            colors,
            vec![
                ("triage".to_string(), "ededed".to_string()),
                ("type/bug".to_string(), "d73a4a".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_label_color_is_rejected() {
        let mut config = sample();
        config
            .labels
            .insert("broken".to_string(), "red".to_string());
        assert!(matches!(
            config.label_colors(),
            Err(ConfigError::InvalidColor { label, .. }) if label == "broken"
        ));
    }

    #[test]
    fn missing_labels_are_an_error() {
        let config = Config::default();
        assert!(matches!(
            config.label_colors(),
            Err(ConfigError::MissingLabels)
        ));
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let result = Config::parse("repos: [unclosed", Path::new("bad.yml"));
        assert!(matches!(result, Err(ConfigError::YamlError { path, .. }) if path == "bad.yml"));
    }
}
