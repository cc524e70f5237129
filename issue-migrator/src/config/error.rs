//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or resolving configuration.
///
/// All of these are fatal at start-up, before any remote call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("Failed to parse config file '{path}': {source}")]
    YamlError {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Missing required file.
    #[error("Missing required file: {path}")]
    MissingFile { path: String },

    /// A repository reference was not of the form `owner/name`.
    #[error("Invalid repository reference '{value}': expected 'owner/name'")]
    InvalidRepoRef { value: String },

    /// A label color was not a 6-digit hex value.
    #[error("Invalid color '{color}' for label '{label}': expected 6 hex digits")]
    InvalidColor { label: String, color: String },

    /// The requested repository key is not present under `repos`.
    #[error("Unknown repository key '{key}'")]
    UnknownRepo { key: String },

    /// No token was given on the command line, in the config, or in `GITHUB_TOKEN`.
    #[error("Missing authentication token: pass --token, set auth.token or GITHUB_TOKEN")]
    MissingToken,

    /// No target repository was given on the command line or in the config.
    #[error("Missing target repository: pass --target or set 'target'")]
    MissingTarget,

    /// The link reference pattern does not compile or lacks a `number` group.
    #[error("Invalid link pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Label provisioning was requested but no labels are configured.
    #[error("No labels configured under 'labels'")]
    MissingLabels,
}
