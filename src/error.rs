//! Error types for datastacks-shell.

use thiserror::Error;

use crate::session::SessionState;

/// Main error type for shell operations.
#[derive(Error, Debug)]
pub enum ShellError {
    /// I/O error on the connection or the terminal.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Could not open the connection.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Credentials could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid state transition attempted.
    #[error("invalid state transition from {from:?} to {to:?}")]
    InvalidStateTransition { from: SessionState, to: SessionState },

    /// A request was issued before the handshake completed or after close.
    #[error("session not interactive: current state is {0:?}")]
    NotInteractive(SessionState),

    /// Server answered the handshake with something other than `OK`.
    #[error("authentication rejected by server: {0:?}")]
    AuthRejected(String),

    /// Server closed the connection.
    #[error("connection closed by server")]
    ConnectionClosed,

    /// No response within the configured read timeout.
    #[error("timed out waiting for response")]
    Timeout,

    /// Frame exceeded the codec limits or was malformed.
    #[error("framing error: {0}")]
    Frame(String),
}

/// Convenience Result type for shell operations.
pub type Result<T> = std::result::Result<T, ShellError>;
