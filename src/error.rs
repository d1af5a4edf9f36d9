//! Error types for the metadata syncer

use thiserror::Error;

/// Result type alias using the syncer's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Syncer error types
#[derive(Error, Debug)]
pub enum Error {
    /// Transport error talking to a remote cluster admin surface
    #[error("Transport error: {0}")]
    Transport(String),

    /// Metadata store error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Task run exceeded its registered timeout
    #[error("Task '{task}' timed out after {timeout_secs}s on cluster {cluster_id}")]
    TaskTimeout {
        task: String,
        cluster_id: i64,
        timeout_secs: u64,
    },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Error::Store(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
