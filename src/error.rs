//! Error types for the console.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using `ConsoleError`.
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Errors surfaced by backend calls, the live feed, and configuration.
///
/// Aggregation never produces these; it trusts its input.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Transport failure: connection refused, DNS, reset.
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-2xx status.
    #[error("Backend returned {status}: {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `detail` field of the error body, or the raw body text.
        detail: String,
    },

    /// Success body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Input rejected before anything was sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Request did not resolve within its deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration could not be read or applied.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsoleError {
    /// Validation failures come from bad input and are not worth retrying as-is.
    pub fn is_validation(&self) -> bool {
        match self {
            ConsoleError::Validation(_) => true,
            ConsoleError::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ConsoleError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ConsoleError::Decode(e.to_string())
        } else {
            ConsoleError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(e: serde_json::Error) -> Self {
        ConsoleError::Decode(e.to_string())
    }
}
