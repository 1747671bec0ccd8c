//! Construction parameters for the S3-compatible object-store client.

use std::fmt;

use url::Url;

use crate::error::ConfigurationError;
use crate::request::parse_http_url;
use crate::token::ShortLivedToken;

/// Default object-store endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://storage.yandexcloud.net";

/// Default signing region.
pub const DEFAULT_REGION: &str = "ru-central1";

/// Credential pair handed to the object-store client.
///
/// The store authenticates with the short-lived token as the access key and an
/// empty secret key. Both must be passed exactly like this.
#[derive(Clone, PartialEq, Eq)]
pub struct ObjectStoreCredentials {
    access_key: String,
    secret_key: String,
}

impl ObjectStoreCredentials {
    /// Credentials bound to `token`.
    #[must_use]
    pub fn from_token(token: &ShortLivedToken) -> Self {
        Self {
            access_key: token.as_str().to_string(),
            secret_key: String::new(),
        }
    }

    /// Access key (the token itself).
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Secret key (always empty).
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for ObjectStoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreCredentials")
            .field("access_key", &"<redacted>")
            .field("secret_key", &self.secret_key)
            .finish()
    }
}

/// Everything an object-store client needs at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectStoreClientConfig {
    /// Service endpoint.
    pub endpoint: Url,
    /// Signing region.
    pub region: String,
    /// Buckets are addressed as `endpoint/bucket/key`. Always set.
    pub path_style: bool,
    /// Credentials bound to one token.
    pub credentials: ObjectStoreCredentials,
}

impl ObjectStoreClientConfig {
    /// Path-style configuration bound to `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the endpoint is not an http(s) URL or
    /// the region is blank.
    pub fn new(
        endpoint: &str,
        region: &str,
        token: &ShortLivedToken,
    ) -> Result<Self, ConfigurationError> {
        if region.trim().is_empty() {
            return Err(ConfigurationError::MissingSetting("region".to_string()));
        }
        Ok(Self {
            endpoint: parse_http_url(endpoint)?,
            region: region.to_string(),
            path_style: true,
            credentials: ObjectStoreCredentials::from_token(token),
        })
    }

    /// Path-style URL of `key` inside `bucket`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidUrl`] if the endpoint cannot take
    /// path segments.
    pub fn object_url(&self, bucket: &str, key: &str) -> Result<Url, ConfigurationError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| ConfigurationError::InvalidUrl(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(bucket)
            .extend(key.split('/'));
        Ok(url)
    }
}
