//! Error types for SimpleRedis
//!
//! Provides a unified error type for all client operations.

use thiserror::Error as ThisError;

/// Result type alias using the crate's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for SimpleRedis operations
#[derive(Debug, ThisError)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("The server has disconnected")]
    ConnectionClosed,

    #[error("Client is closed")]
    ClientClosed,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Reply Errors
    // -------------------------------------------------------------------------
    /// The server answered with an error reply; carries its text verbatim.
    #[error("{0}")]
    Server(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the connection that produced this error can no longer be used.
    ///
    /// After a framing error or a lost stream the position in the byte stream
    /// is unknown, so the connection must be dropped rather than reused.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Io(_) | Error::ConnectionClosed | Error::Protocol(_)
        )
    }

    /// The server's message, if this is a server error.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Error::Server(message) => Some(message),
            _ => None,
        }
    }
}
