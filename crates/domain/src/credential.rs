//! Secret material: the long-lived credential and the token value it is
//! exchanged for. Neither type ever prints its contents.

use std::fmt;

use crate::error::ConfigurationError;

/// The durable secret a user configures once (an OAuth token).
///
/// Immutable after construction. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct LongLivedCredential(String);

impl LongLivedCredential {
    /// Wraps a secret, rejecting empty and whitespace-only input.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyCredential`] when `secret` is blank.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigurationError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigurationError::EmptyCredential);
        }
        Ok(Self(secret))
    }

    /// Exposes the secret for the exchange request body.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LongLivedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LongLivedCredential(<redacted>)")
    }
}

impl TryFrom<String> for LongLivedCredential {
    type Error = ConfigurationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for LongLivedCredential {
    type Error = ConfigurationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque short-lived token string as returned by the exchange.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TokenValue(String);

impl TokenValue {
    /// Wraps a raw token string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters followed by an ellipsis, for diagnostics.
    #[must_use]
    pub fn preview(&self) -> String {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) if self.0.chars().count() > 12 => format!("{}...", &self.0[..idx]),
            _ => "***".to_string(),
        }
    }
}

impl fmt::Debug for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenValue({})", self.preview())
    }
}
