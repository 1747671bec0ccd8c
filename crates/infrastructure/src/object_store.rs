//! reqwest-backed object-store client construction.
//!
//! Object operations themselves stay with the caller: the client only fixes
//! the endpoint, region, addressing style and the token it authenticates with.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};
use url::Url;
use ycs3_application::ObjectStoreConnector;
use ycs3_domain::{ConfigurationError, HttpMethod, ObjectStoreClientConfig};

use crate::http::{Timeouts, build_http_client, to_reqwest_method};

/// An HTTP client bound to one token and one set of construction parameters.
#[derive(Debug)]
pub struct ObjectStoreClient {
    http: Client,
    config: ObjectStoreClientConfig,
}

impl ObjectStoreClient {
    /// Construction parameters this client was built with.
    #[must_use]
    pub const fn config(&self) -> &ObjectStoreClientConfig {
        &self.config
    }

    /// Service endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.config.endpoint
    }

    /// Signing region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.config.region
    }

    /// URL for `key` in `bucket`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidUrl`] if no valid URL results.
    pub fn object_url(&self, bucket: &str, key: &str) -> Result<Url, ConfigurationError> {
        self.config.object_url(bucket, key)
    }

    /// A request for `key` in `bucket` that already carries the bound token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidUrl`] if no valid URL results.
    pub fn request(
        &self,
        method: HttpMethod,
        bucket: &str,
        key: &str,
    ) -> Result<RequestBuilder, ConfigurationError> {
        let url = self.object_url(bucket, key)?;
        Ok(self.http.request(to_reqwest_method(method), url))
    }
}

/// Builds [`ObjectStoreClient`]s for the client factory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestObjectStoreConnector {
    timeouts: Timeouts,
}

impl ReqwestObjectStoreConnector {
    /// Connector applying `timeouts` to every client it builds.
    #[must_use]
    pub const fn new(timeouts: Timeouts) -> Self {
        Self { timeouts }
    }
}

impl ObjectStoreConnector for ReqwestObjectStoreConnector {
    type Client = ObjectStoreClient;

    fn connect(
        &self,
        config: &ObjectStoreClientConfig,
    ) -> Result<ObjectStoreClient, ConfigurationError> {
        let authorization = format!("Bearer {}", config.credentials.access_key());
        let mut bearer = HeaderValue::from_str(&authorization)
            .map_err(|e| ConfigurationError::ClientBuild(e.to_string()))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        Ok(ObjectStoreClient {
            http: build_http_client(self.timeouts, headers)?,
            config: config.clone(),
        })
    }
}
