use thiserror::Error;

/// A request that never produced a response (connection, DNS, timeout).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Errors from the resilient request executor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    #[error("network error: {0}")]
    Transport(#[from] TransportError),

    #[error("request failed after maximum retries ({attempts} attempts)")]
    MaxRetriesExceeded { attempts: u32 },

    #[error("invalid response body (HTTP {status}): {message}")]
    InvalidBody { status: u16, message: String },
}

/// Errors from repository operations (used by trait definitions in nexus-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors surfaced by the chat service before a request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
}
