//! Error types for barehttp-core

use thiserror::Error;

/// Result type alias for barehttp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the barehttp server
#[derive(Debug, Error)]
pub enum Error {
    /// Request line or header block could not be parsed
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// A request line or header line exceeded the line limit
    #[error("Request head too large: {0}")]
    HeadTooLarge(String),

    /// Body too large
    #[error("Body too large: {size} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { size: usize, limit: usize },

    /// Listen address could not be resolved
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Shell process could not be started
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Shell process outlived the configured timeout
    #[error("Command timed out after {ms} ms")]
    CommandTimeout { ms: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for errors caused by the client rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedRequest(_) | Error::HeadTooLarge(_) | Error::BodyTooLarge { .. }
        )
    }
}
