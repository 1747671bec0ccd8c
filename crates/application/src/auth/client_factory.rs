//! Produces clients and requests that always carry a fresh bearer token.

use std::sync::Arc;

use serde_json::Value;
use ycs3_domain::request::parse_http_url;
use ycs3_domain::{AuthenticatedRequest, HttpMethod};

use super::object_store_handle::ObjectStoreHandle;
use super::token_provider::TokenProvider;
use crate::error::ApplicationResult;
use crate::ports::ObjectStoreConnector;

/// Builds authenticated clients for both downstream surfaces.
///
/// Resource-management calls get a token attached per request. The
/// object-store client binds its token at construction, so it is handed out
/// inside an [`ObjectStoreHandle`] that knows how to rebuild it.
pub struct AuthenticatedClientFactory<K: ObjectStoreConnector> {
    provider: Arc<TokenProvider>,
    connector: Arc<K>,
}

impl<K: ObjectStoreConnector> AuthenticatedClientFactory<K> {
    /// Creates a factory sharing `provider`.
    #[must_use]
    pub const fn new(provider: Arc<TokenProvider>, connector: Arc<K>) -> Self {
        Self {
            provider,
            connector,
        }
    }

    /// The shared token provider.
    #[must_use]
    pub const fn provider(&self) -> &Arc<TokenProvider> {
        &self.provider
    }

    /// Builds an object-store client bound to a currently valid token.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a bad endpoint or region (checked
    /// before any exchange), or the exchange error if no token could be
    /// obtained.
    pub async fn build_object_store_client(
        &self,
        endpoint: &str,
        region: &str,
    ) -> ApplicationResult<ObjectStoreHandle<K>> {
        parse_http_url(endpoint)?;
        ObjectStoreHandle::connect(
            self.provider.clone(),
            self.connector.clone(),
            endpoint.to_string(),
            region.to_string(),
        )
        .await
    }

    /// Builds a resource-management request with `Authorization: Bearer`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a bad URL (checked before any
    /// exchange), or the exchange error if no token could be obtained.
    pub async fn build_resource_management_request(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<Value>,
    ) -> ApplicationResult<AuthenticatedRequest> {
        parse_http_url(url)?;
        let token = self.provider.get_valid_token().await?;
        Ok(AuthenticatedRequest::new(method, url, &token, body)?)
    }
}

impl<K: ObjectStoreConnector> Clone for AuthenticatedClientFactory<K> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            connector: self.connector.clone(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ApplicationError;
    use crate::ports::ManualClock;
    use crate::test_support::ScriptedExchanger;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use ycs3_domain::{ConfigurationError, ExchangeError, ObjectStoreClientConfig, TokenValue};

    /// Records what it was asked to build.
    #[derive(Default)]
    struct RecordingConnector {
        builds: AtomicUsize,
        fail_next: AtomicBool,
    }

    #[derive(Debug)]
    struct FakeClient {
        access_key: String,
        secret_key: String,
        path_style: bool,
    }

    impl ObjectStoreConnector for RecordingConnector {
        type Client = FakeClient;

        fn connect(
            &self,
            config: &ObjectStoreClientConfig,
        ) -> Result<FakeClient, ConfigurationError> {
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(ConfigurationError::ClientBuild("boom".to_string()));
            }
            self.builds.fetch_add(1, Ordering::SeqCst);
            Ok(FakeClient {
                access_key: config.credentials.access_key().to_string(),
                secret_key: config.credentials.secret_key().to_string(),
                path_style: config.path_style,
            })
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap()
    }

    fn factory(
        exchanger: ScriptedExchanger,
    ) -> (
        AuthenticatedClientFactory<RecordingConnector>,
        Arc<ScriptedExchanger>,
        Arc<RecordingConnector>,
        Arc<ManualClock>,
    ) {
        let exchanger = Arc::new(exchanger);
        let clock = Arc::new(ManualClock::new(t0()));
        let provider = TokenProvider::new("y0_secret", exchanger.clone(), clock.clone()).unwrap();
        let connector = Arc::new(RecordingConnector::default());
        let factory = AuthenticatedClientFactory::new(Arc::new(provider), connector.clone());
        (factory, exchanger, connector, clock)
    }

    #[tokio::test]
    async fn test_object_store_client_uses_token_as_access_key() {
        let (factory, _, _, _) = factory(ScriptedExchanger::new());

        let handle = factory
            .build_object_store_client("https://storage.yandexcloud.net", "ru-central1")
            .await
            .unwrap();
        let client = handle.client().await;

        assert_eq!(client.access_key, "T1");
        assert_eq!(client.secret_key, "");
        assert!(client.path_style);
        assert_eq!(handle.config().await.region, "ru-central1");
    }

    #[tokio::test]
    async fn test_handle_goes_stale_with_its_token() {
        let (factory, exchanger, connector, clock) = factory(ScriptedExchanger::new());
        let handle = factory
            .build_object_store_client("https://storage.yandexcloud.net", "ru-central1")
            .await
            .unwrap();

        assert!(!handle.is_stale().await);
        let fresh = handle.fresh_client().await.unwrap();
        assert_eq!(fresh.access_key, "T1");
        assert_eq!(connector.builds.load(Ordering::SeqCst), 1);

        clock.advance(Duration::hours(12));
        assert!(handle.is_stale().await);

        let rebuilt = handle.fresh_client().await.unwrap();
        assert_eq!(rebuilt.access_key, "T2");
        assert_eq!(exchanger.calls(), 2);
        assert_eq!(connector.builds.load(Ordering::SeqCst), 2);
        assert!(!handle.is_stale().await);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_client() {
        let (factory, _, _, clock) = factory(
            ScriptedExchanger::new()
                .then(Ok(TokenValue::new("T1")))
                .then(Err(ExchangeError::Rejected {
                    status: 401,
                    message: "revoked".to_string(),
                })),
        );
        let handle = factory
            .build_object_store_client("https://storage.yandexcloud.net", "ru-central1")
            .await
            .unwrap();
        clock.advance(Duration::hours(12));

        let err = handle.refresh().await.unwrap_err();

        assert!(err.is_authentication_failure());
        assert_eq!(handle.client().await.access_key, "T1");
        assert!(handle.is_stale().await);
    }

    #[tokio::test]
    async fn test_failed_rebuild_keeps_previous_client() {
        let (factory, _, connector, clock) = factory(ScriptedExchanger::new());
        let handle = factory
            .build_object_store_client("https://storage.yandexcloud.net", "ru-central1")
            .await
            .unwrap();
        clock.advance(Duration::hours(12));
        connector.fail_next.store(true, Ordering::SeqCst);

        let err = handle.refresh().await.unwrap_err();

        assert_eq!(
            err,
            ApplicationError::Configuration(ConfigurationError::ClientBuild("boom".to_string()))
        );
        assert_eq!(handle.client().await.access_key, "T1");
    }

    #[tokio::test]
    async fn test_bad_endpoint_fails_before_exchange() {
        let (factory, exchanger, _, _) = factory(ScriptedExchanger::new());

        let result = factory
            .build_object_store_client("storage.yandexcloud.net", "ru-central1")
            .await;

        assert!(matches!(result, Err(ApplicationError::Configuration(_))));
        assert_eq!(exchanger.calls(), 0);
    }

    #[tokio::test]
    async fn test_resource_request_carries_fresh_bearer() {
        let (factory, exchanger, _, clock) = factory(ScriptedExchanger::new());
        let url = "https://storage.api.cloud.yandex.net/storage/v1/buckets";

        let first = factory
            .build_resource_management_request(HttpMethod::Get, url, None)
            .await
            .unwrap();
        assert_eq!(first.header("Authorization"), Some("Bearer T1"));

        clock.advance(Duration::hours(12));
        let second = factory
            .build_resource_management_request(
                HttpMethod::Post,
                url,
                Some(json!({"name": "media", "folderId": "b1g"})),
            )
            .await
            .unwrap();

        assert_eq!(second.header("Authorization"), Some("Bearer T2"));
        assert_eq!(
            second.body,
            Some(json!({"name": "media", "folderId": "b1g"}))
        );
        assert_eq!(exchanger.calls(), 2);
    }

    #[tokio::test]
    async fn test_resource_request_surfaces_exchange_error() {
        let (factory, _, _, _) =
            factory(ScriptedExchanger::new().then(Err(ExchangeError::Timeout)));

        let err = factory
            .build_resource_management_request(HttpMethod::Get, "https://example.test/x", None)
            .await
            .unwrap_err();

        assert_eq!(err, ApplicationError::Exchange(ExchangeError::Timeout));
    }
}
