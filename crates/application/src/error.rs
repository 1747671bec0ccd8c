//! Application error types

use thiserror::Error;
use ycs3_domain::{ConfigurationError, DownstreamApiError, ExchangeError};

/// Application-level errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApplicationError {
    /// Configuration is invalid; never retried.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Authentication failed: no valid token could be obtained.
    #[error("authentication error: {0}")]
    Exchange(#[from] ExchangeError),

    /// Authentication succeeded but the downstream call failed.
    #[error("downstream error: {0}")]
    Downstream(#[from] DownstreamApiError),
}

impl ApplicationError {
    /// Returns true if the caller may retry with backoff.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Configuration(_) => false,
            Self::Exchange(e) => e.is_retryable(),
            Self::Downstream(e) => e.is_retryable(),
        }
    }

    /// Returns true if the failure happened while authenticating.
    #[must_use]
    pub const fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::Exchange(_))
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_families_stay_distinct() {
        let auth: ApplicationError = ExchangeError::Timeout.into();
        let api: ApplicationError = DownstreamApiError::Status {
            status: 404,
            message: "no such bucket".to_string(),
        }
        .into();

        assert!(auth.is_authentication_failure());
        assert!(!api.is_authentication_failure());
        assert_eq!(
            api.to_string(),
            "downstream error: API error (404): no such bucket"
        );
    }

    #[test]
    fn test_configuration_never_retryable() {
        let err: ApplicationError = ConfigurationError::EmptyCredential.into();
        assert!(!err.is_retryable());
        let err: ApplicationError = ExchangeError::Network("reset".to_string()).into();
        assert!(err.is_retryable());
    }
}
