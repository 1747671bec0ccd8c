//! The single choke point every outbound call goes through for a token.
//!
//! The cache sits behind an async mutex that stays locked across the
//! exchange. Concurrent callers that find the cache expired queue on that lock
//! and, once the first exchange has stored its result, are served from the
//! cache: one exchange per expiry, whatever the number of callers.
//!
//! A token is stored only after the exchange returns successfully. A failed,
//! cancelled or dropped exchange leaves the cache exactly as it was.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use ycs3_domain::{
    ConfigurationError, ExchangeError, LongLivedCredential, ShortLivedToken, TokenPolicy,
};

use super::token_cache::{TokenCache, TokenStatus};
use crate::ports::{Clock, CredentialExchanger};

/// Serves valid short-lived tokens, exchanging the long-lived credential
/// when the cached one has expired.
pub struct TokenProvider {
    secret: LongLivedCredential,
    exchanger: Arc<dyn CredentialExchanger>,
    clock: Arc<dyn Clock>,
    cache: Mutex<TokenCache>,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret", &self.secret)
            .finish_non_exhaustive()
    }
}

impl TokenProvider {
    /// Creates a provider with the default 12h/5m policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyCredential`] for a blank secret.
    /// No network call is made.
    pub fn new(
        secret: impl Into<String>,
        exchanger: Arc<dyn CredentialExchanger>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::from_credential(
            LongLivedCredential::new(secret)?,
            exchanger,
            clock,
        ))
    }

    /// Creates a provider from an already validated credential.
    #[must_use]
    pub fn from_credential(
        secret: LongLivedCredential,
        exchanger: Arc<dyn CredentialExchanger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            secret,
            exchanger,
            clock,
            cache: Mutex::new(TokenCache::default()),
        }
    }

    /// Replaces the token lifetime policy.
    #[must_use]
    pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
        *self.cache.get_mut() = TokenCache::new(policy);
        self
    }

    /// Current time according to the injected clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Returns a token valid at the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError`] if no valid token is cached and the exchange
    /// fails.
    pub async fn get_valid_token(&self) -> Result<ShortLivedToken, ExchangeError> {
        let mut cache = self.cache.lock().await;
        let now = self.clock.now();
        self.serve_or_exchange(&mut cache, now).await
    }

    /// Returns a token valid at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError`] if no valid token is cached and the exchange
    /// fails.
    pub async fn get_valid_token_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<ShortLivedToken, ExchangeError> {
        let mut cache = self.cache.lock().await;
        self.serve_or_exchange(&mut cache, now).await
    }

    /// Like [`Self::get_valid_token`] but gives up when `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Cancelled`] on cancellation, otherwise the
    /// errors of [`Self::get_valid_token`].
    pub async fn get_valid_token_with_cancellation(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ShortLivedToken, ExchangeError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("token request cancelled");
                Err(ExchangeError::Cancelled)
            }
            result = self.get_valid_token() => result,
        }
    }

    /// Forgets the cached token so the next request exchanges again.
    ///
    /// Meant for a downstream 401 on a token the cache still considers valid.
    /// Waits for an in-flight exchange to finish first, so the token it
    /// stores is the one that gets dropped.
    pub async fn invalidate(&self) {
        if self.cache.lock().await.clear().is_some() {
            info!("cached token invalidated");
        }
    }

    /// The cached token, valid or not.
    ///
    /// Waits for an in-flight exchange, which can take as long as the
    /// exchanger's timeout.
    pub async fn peek(&self) -> Option<ShortLivedToken> {
        self.cache.lock().await.peek().cloned()
    }

    /// Status of the cached token at the clock's current time.
    ///
    /// Waits for an in-flight exchange; see [`Self::try_status`] for a
    /// non-waiting read.
    pub async fn status(&self) -> TokenStatus {
        let cache = self.cache.lock().await;
        cache.status(self.clock.now())
    }

    /// Status of the cached token at `now`. Waits like [`Self::status`].
    pub async fn status_at(&self, now: DateTime<Utc>) -> TokenStatus {
        self.cache.lock().await.status(now)
    }

    /// Status without waiting, or `None` while an exchange is in flight.
    #[must_use]
    pub fn try_status(&self) -> Option<TokenStatus> {
        let cache = self.cache.try_lock().ok()?;
        Some(cache.status(self.clock.now()))
    }

    async fn serve_or_exchange(
        &self,
        cache: &mut TokenCache,
        now: DateTime<Utc>,
    ) -> Result<ShortLivedToken, ExchangeError> {
        if let Some(token) = cache.valid_token(now) {
            debug!(expires_at = %token.expires_at(), "serving cached token");
            return Ok(token.clone());
        }

        debug!(had_token = cache.peek().is_some(), "exchanging credential for a new token");
        let value = self.exchanger.exchange(&self.secret).await.inspect_err(|e| {
            warn!(error = %e, "token exchange failed");
        })?;

        let token = cache.store(value, now).clone();
        info!(
            token = %token.value().preview(),
            expires_at = %token.expires_at(),
            "obtained short-lived token"
        );
        Ok(token)
    }
}
