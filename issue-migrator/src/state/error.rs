//! State persistence error types.

use thiserror::Error;

/// Errors that can occur while loading or saving migration state.
#[derive(Debug, Error)]
pub enum StateError {
    /// Failed to read or write the state file.
    #[error("Failed to access state file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The state file exists but is not valid state.
    #[error("Failed to parse state file '{path}': {source}")]
    ParseError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize state.
    #[error("Failed to serialize state: {0}")]
    SerializeError(#[from] serde_json::Error),
}
