// src/errors.rs

//! Crate-wide error type and `Result` alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BeamlineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// State file exists but cannot be read or parsed. Fatal: requires
    /// operator intervention rather than a silent reset.
    #[error("Failed to load state file {path}: {reason}")]
    StateLoad { path: PathBuf, reason: String },

    #[error("Failed to persist state file {path}: {reason}")]
    StatePersist { path: PathBuf, reason: String },

    #[error("A transaction is already in progress")]
    TransactionInProgress,

    #[error("No open transaction")]
    NoTransaction,

    /// State path shape violation (e.g. writing through a non-object value).
    #[error("State error: {0}")]
    State(String),

    /// Session establishment or pool construction failure.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Distinct from [`BeamlineError::Connection`]: the pool had no free
    /// session within the acquire timeout.
    #[error("Timed out waiting for a session from the connection pool")]
    AcquireTimeout,

    /// The circuit breaker rejected the call without invoking the wrapped
    /// operation.
    #[error("Circuit is open")]
    CircuitOpen,

    #[error("Transfer failed: {0}")]
    Transfer(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

impl BeamlineError {
    /// Whether the retry wrapper should re-invoke the failed operation.
    ///
    /// Only connection-kind failures count as transient. `CircuitOpen` is
    /// deliberately excluded: a tripped breaker short-circuits the retry
    /// loop as well.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BeamlineError::Connection(_) | BeamlineError::AcquireTimeout
        )
    }
}

pub type Result<T> = std::result::Result<T, BeamlineError>;
