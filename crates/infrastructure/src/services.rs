//! Wires settings into a ready-to-use service graph.

use std::sync::Arc;

use ycs3_application::{
    ApplicationResult, AuthenticatedClientFactory, ObjectStoreHandle, TokenProvider,
};
use ycs3_domain::{ConfigurationError, Settings};

use crate::adapters::SystemClock;
use crate::auth::IamTokenExchanger;
use crate::http::{ClientFactory, ReqwestResourceClient, ResourceManagerClient, Timeouts};
use crate::object_store::ReqwestObjectStoreConnector;

/// One token provider shared by every client built from it.
#[derive(Clone)]
pub struct Ycs3Services {
    settings: Settings,
    factory: ClientFactory,
    resource_manager: ResourceManagerClient,
}

impl Ycs3Services {
    /// Builds the services described by `settings`.
    ///
    /// No network call is made; the first token is exchanged lazily.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for a missing or empty OAuth token, a
    /// bad IAM endpoint, or an HTTP client that cannot be built.
    pub fn from_settings(settings: Settings) -> Result<Self, ConfigurationError> {
        let credential = settings.credential()?;
        let timeouts = Timeouts::from_settings(&settings);

        let exchanger = IamTokenExchanger::new(&settings.iam_endpoint, timeouts)?;
        let provider = Arc::new(TokenProvider::from_credential(
            credential,
            Arc::new(exchanger),
            Arc::new(SystemClock::new()),
        ));
        let factory = AuthenticatedClientFactory::new(
            provider,
            Arc::new(ReqwestObjectStoreConnector::new(timeouts)),
        );
        let resource_manager =
            ResourceManagerClient::new(factory.clone(), ReqwestResourceClient::new(timeouts)?)
                .with_resource_manager_url(&settings.resource_manager_endpoint)
                .with_iam_url(&settings.iam_api_endpoint);

        Ok(Self {
            settings,
            factory,
            resource_manager,
        })
    }

    /// Settings the services were built from.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The shared token provider.
    #[must_use]
    pub const fn provider(&self) -> &Arc<TokenProvider> {
        self.factory.provider()
    }

    /// The client factory.
    #[must_use]
    pub const fn factory(&self) -> &ClientFactory {
        &self.factory
    }

    /// The resource-management client.
    #[must_use]
    pub const fn resource_manager(&self) -> &ResourceManagerClient {
        &self.resource_manager
    }

    /// Object-store client for the configured endpoint and region.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for bad endpoint settings, or the
    /// exchange error if no token could be obtained.
    pub async fn object_store(
        &self,
    ) -> ApplicationResult<ObjectStoreHandle<ReqwestObjectStoreConnector>> {
        self.factory
            .build_object_store_client(&self.settings.endpoint, &self.settings.region)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_token_is_configuration_error() {
        let result = Ycs3Services::from_settings(Settings::default());

        assert_eq!(
            result.err(),
            Some(ConfigurationError::MissingSetting("oauth_token".to_string()))
        );
    }

    #[test]
    fn test_blank_token_is_configuration_error() {
        let settings = Settings {
            oauth_token: Some("   ".to_string()),
            ..Settings::default()
        };

        assert_eq!(
            Ycs3Services::from_settings(settings).err(),
            Some(ConfigurationError::EmptyCredential)
        );
    }

    #[tokio::test]
    async fn test_builds_without_network() {
        let settings = Settings {
            oauth_token: Some("y0_token".to_string()),
            ..Settings::default()
        };

        let services = Ycs3Services::from_settings(settings).unwrap();

        assert!(services.provider().peek().await.is_none());
        assert_eq!(services.settings().region, "ru-central1");
    }
}
