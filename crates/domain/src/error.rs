//! Domain error types
//!
//! Three families are kept apart so callers can tell "the configuration is
//! wrong" from "I couldn't authenticate" from "I authenticated but the
//! operation failed".

use thiserror::Error;

/// Invalid or missing configuration. Fatal and never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The long-lived credential was empty.
    #[error("OAuth token cannot be empty")]
    EmptyCredential,

    /// A required setting is missing or blank.
    #[error("missing required setting: {0}")]
    MissingSetting(String),

    /// The token validity policy is inconsistent.
    #[error("invalid token policy: {0}")]
    InvalidPolicy(String),

    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A body was supplied for a method that does not take one.
    #[error("{0} requests cannot carry a body")]
    BodyNotAllowed(String),

    /// A client could not be constructed from the given parameters.
    #[error("failed to build client: {0}")]
    ClientBuild(String),

    /// Settings could not be loaded or parsed.
    #[error("failed to load settings: {0}")]
    Load(String),
}

/// Failure while exchanging the long-lived credential for a short-lived token.
///
/// Surfaced to the caller, who may retry with backoff.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// The authority answered with a non-success status.
    #[error("token exchange rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The exchange request never produced a response.
    #[error("token exchange network error: {0}")]
    Network(String),

    /// The exchange request timed out.
    #[error("token exchange timed out")]
    Timeout,

    /// The response could not be parsed or lacked the token field.
    #[error("malformed token exchange response: {0}")]
    MalformedResponse(String),

    /// The exchange was cancelled before it completed.
    #[error("token exchange cancelled")]
    Cancelled,
}

impl ExchangeError {
    /// Returns true if repeating the exchange later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Rejected { status, .. } => *status >= 500 || *status == 429,
            Self::MalformedResponse(_) | Self::Cancelled => false,
        }
    }
}

/// Failure reported by a downstream API after authentication succeeded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DownstreamApiError {
    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The request never produced a response.
    #[error("API network error: {0}")]
    Network(String),

    /// The response body did not have the expected shape.
    #[error("failed to decode API response: {0}")]
    Decode(String),
}

impl DownstreamApiError {
    /// Returns true if the API rejected the bearer token itself.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Returns true if repeating the call later may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) => false,
        }
    }
}
