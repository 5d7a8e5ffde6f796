//! Error types for the storage node client

use thiserror::Error;

/// Errors that can occur when talking to a storage node
#[derive(Error, Debug)]
pub enum Error {
    /// The provider could not be constructed (bad URL, unsupported scheme, TLS setup)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Network failure while a call was in flight, or a reply that does not
    /// belong to the call
    #[error("Transport error: {0}")]
    Transport(String),

    /// The node answered with a non-success HTTP status
    #[error("HTTP error (status {status}): {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body text
        message: String,
    },

    /// Request timeout
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// JSON-RPC error object returned by the node, passed through verbatim
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message from the node
        message: String,
        /// Optional structured error data
        data: Option<serde_json::Value>,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed hex text for a hash or address
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

impl Error {
    /// Whether a provider may safely resend the request that produced this error.
    ///
    /// Only failures that happened before a JSON-RPC response was decoded qualify.
    /// Client-side HTTP rejections (4xx) are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) | Error::Timeout(_) => true,
            Error::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
