//! `owner/name` repository references.

use super::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A repository on the issue tracker, addressed by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl RepoRef {
    /// Parses an `owner/name` string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRepoRef`] unless the value has exactly two
    /// non-empty `/`-separated parts.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let parts: Vec<&str> = value.trim().split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: (*owner).to_string(),
                name: (*name).to_string(),
            }),
            _ => Err(ConfigError::InvalidRepoRef {
                value: value.to_string(),
            }),
        }
    }

    /// Returns the `owner/name` form.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_owner_and_name() {
        let repo = RepoRef::parse("acme/widgets").unwrap();
        assert_eq!(repo.owner, "acme");
        assert_eq!(repo.name, "widgets");
        assert_eq!(repo.to_string(), "acme/widgets");
    }

    #[test]
    fn rejects_malformed_refs() {
        for value in ["acme", "acme/widgets/extra", "/widgets", "acme/", ""] {
            assert!(
                matches!(
                    RepoRef::parse(value),
                    Err(ConfigError::InvalidRepoRef { .. })
                ),
                "{value} should be rejected"
            );
        }
    }
}
