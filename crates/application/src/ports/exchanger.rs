//! Credential exchange port

use async_trait::async_trait;
use ycs3_domain::{ExchangeError, LongLivedCredential, TokenValue};

/// Port for trading a long-lived credential for a short-lived token.
///
/// Implementations perform exactly one outbound call per invocation and never
/// retry; retry policy belongs to the caller. The result depends only on the
/// secret passed in.
#[async_trait]
pub trait CredentialExchanger: Send + Sync {
    /// Exchanges `secret` for a token value.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError`] when the authority rejects the secret, the
    /// network call fails, or the response lacks the token field.
    async fn exchange(&self, secret: &LongLivedCredential) -> Result<TokenValue, ExchangeError>;
}
