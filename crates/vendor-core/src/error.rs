//! Error types for vendor data operations.
//!
//! This module defines [`VendorError`] which covers the failures of the
//! collaborators around the metrics engine: fetching statements, parsing
//! provider payloads, and persisting records. The ratio engine itself never
//! produces an error; it reports unusable inputs as null metrics.

use thiserror::Error;

/// Errors that can occur while fetching, parsing, or storing vendor data.
#[derive(Error, Debug)]
pub enum VendorError {
    /// Network-related errors (connection failures, timeouts, HTTP status errors).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The requested ticker is unknown.
    #[error("Ticker not found: {0}")]
    TickerNotFound(String),

    /// A statement could not be obtained for the ticker.
    #[error("{statement} not available for {ticker}")]
    DataNotAvailable {
        /// The ticker that was requested.
        ticker: String,
        /// The statement that was requested.
        statement: String,
    },

    /// Error parsing a provider payload or a stored record.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error interacting with the metrics store.
    #[error("Storage error: {0}")]
    Storage(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// No usable credentials for a provider.
    #[error("Authentication failed for provider {0}")]
    AuthenticationFailed(String),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`VendorError`].
pub type Result<T> = std::result::Result<T, VendorError>;
