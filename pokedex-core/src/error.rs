//! Error types for the Pokedex.
//!
//! The cache itself is total and never fails; these errors describe the
//! fetch-and-decode path that sits in front of it.

use thiserror::Error;

/// Result type alias using `PokedexError`.
pub type Result<T> = std::result::Result<T, PokedexError>;

/// Main error type for Pokedex operations.
#[derive(Debug, Error)]
pub enum PokedexError {
    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Caller passed an empty or malformed argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// HTTP request failed before a response was received.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The server answered 404.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The server answered with a status other than 200.
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        /// Requested URL
        url: String,
        /// HTTP status code returned
        status: u16,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl PokedexError {
    /// Returns true if this error is recoverable (can retry).
    pub fn is_recoverable(&self) -> bool {
        match self {
            PokedexError::HttpError(_) => true,
            PokedexError::UnexpectedStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if the server told us the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PokedexError::NotFound(_))
    }
}
