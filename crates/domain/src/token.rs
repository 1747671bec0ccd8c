//! Short-lived tokens and the policy that decides their lifetime.

use chrono::{DateTime, Duration, Utc};

use crate::credential::TokenValue;
use crate::error::ConfigurationError;

/// Nominal lifetime of a token issued by the exchange.
pub const DEFAULT_VALIDITY_HOURS: i64 = 12;

/// Time subtracted from the validity window to refresh before true expiry.
pub const DEFAULT_SAFETY_MARGIN_MINUTES: i64 = 5;

/// Longest validity window a policy accepts.
pub const MAX_VALIDITY_DAYS: i64 = 366;

/// Lifetime rules applied when a token is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    validity: Duration,
    safety_margin: Duration,
}

impl TokenPolicy {
    /// Creates a policy from a validity window and a safety margin.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidPolicy`] if the margin is negative,
    /// not strictly smaller than the validity, or the validity exceeds
    /// [`MAX_VALIDITY_DAYS`].
    pub fn new(validity: Duration, safety_margin: Duration) -> Result<Self, ConfigurationError> {
        if validity > Duration::days(MAX_VALIDITY_DAYS) {
            return Err(ConfigurationError::InvalidPolicy(format!(
                "validity must not exceed {MAX_VALIDITY_DAYS} days"
            )));
        }
        if safety_margin < Duration::zero() {
            return Err(ConfigurationError::InvalidPolicy(
                "safety margin must not be negative".to_string(),
            ));
        }
        if safety_margin >= validity {
            return Err(ConfigurationError::InvalidPolicy(format!(
                "safety margin ({}s) must be shorter than validity ({}s)",
                safety_margin.num_seconds(),
                validity.num_seconds()
            )));
        }
        Ok(Self {
            validity,
            safety_margin,
        })
    }

    /// Nominal validity window.
    #[must_use]
    pub const fn validity(&self) -> Duration {
        self.validity
    }

    /// Margin subtracted from the validity window.
    #[must_use]
    pub const fn safety_margin(&self) -> Duration {
        self.safety_margin
    }

    /// Instant after which a token issued at `issued_at` must be refreshed.
    ///
    /// Saturates at the latest representable instant.
    #[must_use]
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at
            .checked_add_signed(self.validity - self.safety_margin)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            validity: Duration::hours(DEFAULT_VALIDITY_HOURS),
            safety_margin: Duration::minutes(DEFAULT_SAFETY_MARGIN_MINUTES),
        }
    }
}

/// A token value stamped with its issuance and refresh instants.
///
/// `expires_at` is always derived from `issued_at` through a [`TokenPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLivedToken {
    value: TokenValue,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl ShortLivedToken {
    /// Stamps `value` as issued at `issued_at` under `policy`.
    #[must_use]
    pub fn issue(value: TokenValue, issued_at: DateTime<Utc>, policy: &TokenPolicy) -> Self {
        Self {
            value,
            issued_at,
            expires_at: policy.expires_at(issued_at),
        }
    }

    /// The opaque token value.
    #[must_use]
    pub const fn value(&self) -> &TokenValue {
        &self.value
    }

    /// The raw token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    /// When the token was obtained.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// When the token stops being served.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// True iff `now < expires_at`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Seconds left before refresh, clamped at zero.
    #[must_use]
    pub fn seconds_remaining(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    /// The `Authorization` header value.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.value.as_str())
    }
}
