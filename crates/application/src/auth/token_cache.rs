//! In-memory cache for the current short-lived token.
//!
//! Holds at most one token. Expiry is computed on demand from the stored
//! instant; nothing is evicted proactively.

use chrono::{DateTime, Utc};
use ycs3_domain::{ShortLivedToken, TokenPolicy, TokenValue};

/// Single-slot token cache.
#[derive(Debug, Clone, Default)]
pub struct TokenCache {
    token: Option<ShortLivedToken>,
    policy: TokenPolicy,
}

impl TokenCache {
    /// Creates an empty cache using `policy` to stamp stored tokens.
    #[must_use]
    pub const fn new(policy: TokenPolicy) -> Self {
        Self {
            token: None,
            policy,
        }
    }

    /// The policy applied by [`Self::store`].
    #[must_use]
    pub const fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// True iff a token is present and `now < expires_at`.
    #[must_use]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.token.as_ref().is_some_and(|t| t.is_valid_at(now))
    }

    /// The cached token if it is still valid at `now`.
    #[must_use]
    pub fn valid_token(&self, now: DateTime<Utc>) -> Option<&ShortLivedToken> {
        self.token.as_ref().filter(|t| t.is_valid_at(now))
    }

    /// Stores `value` as issued at `now`, replacing any previous token.
    pub fn store(&mut self, value: TokenValue, now: DateTime<Utc>) -> &ShortLivedToken {
        self.token.insert(ShortLivedToken::issue(value, now, &self.policy))
    }

    /// The cached token, valid or not.
    #[must_use]
    pub const fn peek(&self) -> Option<&ShortLivedToken> {
        self.token.as_ref()
    }

    /// Forgets the cached token.
    pub const fn clear(&mut self) -> Option<ShortLivedToken> {
        self.token.take()
    }

    /// Token status at `now` for diagnostics.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> TokenStatus {
        match &self.token {
            None => TokenStatus::NotAuthenticated,
            Some(token) if token.is_valid_at(now) => TokenStatus::Valid {
                seconds_remaining: token.seconds_remaining(now),
            },
            Some(token) => TokenStatus::Expired {
                expired_at: token.expires_at(),
            },
        }
    }
}

/// Status of the cached token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// No token has been fetched yet.
    NotAuthenticated,
    /// A token is cached and will be served.
    Valid {
        /// Seconds until the token must be refreshed.
        seconds_remaining: i64,
    },
    /// A token is cached but the next request will exchange a new one.
    Expired {
        /// When the cached token stopped being served.
        expired_at: DateTime<Utc>,
    },
}

impl TokenStatus {
    /// Returns true if the cached token would be served.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Human-readable summary.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not authenticated".to_string(),
            Self::Valid { seconds_remaining } => {
                if *seconds_remaining > 3600 {
                    format!("Valid for {} hours", seconds_remaining / 3600)
                } else if *seconds_remaining > 60 {
                    format!("Valid for {} minutes", seconds_remaining / 60)
                } else {
                    format!("Valid for {seconds_remaining} seconds")
                }
            }
            Self::Expired { expired_at } => format!("Expired at {}", expired_at.to_rfc3339()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_cache_is_invalid() {
        let cache = TokenCache::default();
        assert!(!cache.is_valid(t0()));
        assert!(cache.peek().is_none());
        assert_eq!(cache.status(t0()), TokenStatus::NotAuthenticated);
    }

    #[test]
    fn test_store_computes_expiry_from_now() {
        let mut cache = TokenCache::default();
        let stored = cache.store(TokenValue::new("T1"), t0()).clone();

        assert_eq!(stored.issued_at(), t0());
        assert_eq!(
            stored.expires_at(),
            t0() + Duration::hours(11) + Duration::minutes(55)
        );
        assert_eq!(cache.peek(), Some(&stored));
    }

    #[test]
    fn test_validity_window() {
        let mut cache = TokenCache::default();
        cache.store(TokenValue::new("T1"), t0());
        let boundary = t0() + Duration::hours(11) + Duration::minutes(55);

        assert!(cache.is_valid(boundary - Duration::seconds(1)));
        assert!(!cache.is_valid(boundary));
        assert!(cache.valid_token(boundary).is_none());
        // expired tokens stay cached until replaced
        assert!(cache.peek().is_some());
    }

    #[test]
    fn test_store_replaces_previous_token() {
        let mut cache = TokenCache::default();
        cache.store(TokenValue::new("T1"), t0());
        cache.store(TokenValue::new("T2"), t0() + Duration::hours(12));

        assert_eq!(cache.peek().unwrap().as_str(), "T2");
    }

    #[test]
    fn test_clear() {
        let mut cache = TokenCache::default();
        cache.store(TokenValue::new("T1"), t0());
        assert_eq!(cache.clear().unwrap().as_str(), "T1");
        assert!(cache.peek().is_none());
    }

    #[test]
    fn test_status_transitions() {
        let mut cache = TokenCache::default();
        cache.store(TokenValue::new("T1"), t0());

        let status = cache.status(t0());
        assert!(status.is_valid());
        assert!(status.display_message().contains("hours"));

        let later = t0() + Duration::hours(12);
        let status = cache.status(later);
        assert!(!status.is_valid());
        assert_eq!(
            status,
            TokenStatus::Expired {
                expired_at: t0() + Duration::hours(11) + Duration::minutes(55)
            }
        );
    }
}
