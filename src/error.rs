//! Error types for chatwire.

use thiserror::Error;

/// Main error type for all chatwire operations.
#[derive(Debug, Error)]
pub enum ChatwireError {
    /// I/O error during socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Framing error (malformed or oversized header).
    ///
    /// There is no resynchronization within a stream: the connection
    /// carrying the bad frame is abandoned.
    #[error("framing error: {0}")]
    Frame(String),

    /// Connection closed while an operation was pending.
    #[error("connection closed")]
    ConnectionClosed,
}

/// Result type alias using ChatwireError.
pub type Result<T> = std::result::Result<T, ChatwireError>;
