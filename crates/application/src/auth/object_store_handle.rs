//! Rebuild-on-stale handle around an object-store client.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};
use ycs3_domain::{ObjectStoreClientConfig, ShortLivedToken};

use super::token_provider::TokenProvider;
use crate::error::ApplicationResult;
use crate::ports::ObjectStoreConnector;

/// A client together with the token it was built from.
struct Bound<C> {
    client: Arc<C>,
    config: ObjectStoreClientConfig,
    token: ShortLivedToken,
}

/// Owns an object-store client and swaps it for a new instance when the
/// token it was built with goes stale.
///
/// The inner client is never mutated. A refresh builds a complete new client
/// and installs it only once construction succeeded, so a failed refresh
/// leaves the previous client usable.
pub struct ObjectStoreHandle<K: ObjectStoreConnector> {
    provider: Arc<TokenProvider>,
    connector: Arc<K>,
    endpoint: String,
    region: String,
    current: RwLock<Bound<K::Client>>,
}

impl<K: ObjectStoreConnector> ObjectStoreHandle<K> {
    pub(crate) async fn connect(
        provider: Arc<TokenProvider>,
        connector: Arc<K>,
        endpoint: String,
        region: String,
    ) -> ApplicationResult<Self> {
        let bound = build(&provider, connector.as_ref(), &endpoint, &region).await?;
        Ok(Self {
            provider,
            connector,
            endpoint,
            region,
            current: RwLock::new(bound),
        })
    }

    /// The currently installed client, stale or not.
    pub async fn client(&self) -> Arc<K::Client> {
        self.current.read().await.client.clone()
    }

    /// Construction parameters of the installed client.
    pub async fn config(&self) -> ObjectStoreClientConfig {
        self.current.read().await.config.clone()
    }

    /// Expiry of the token the installed client is bound to.
    pub async fn expires_at(&self) -> DateTime<Utc> {
        self.current.read().await.token.expires_at()
    }

    /// True once the bound token has expired at `now`.
    pub async fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        !self.current.read().await.token.is_valid_at(now)
    }

    /// True once the bound token has expired.
    pub async fn is_stale(&self) -> bool {
        self.is_stale_at(self.provider.now()).await
    }

    /// Rebuilds the client with a currently valid token and installs it.
    ///
    /// # Errors
    ///
    /// Returns the exchange or construction error; the previous client stays
    /// installed.
    pub async fn refresh(&self) -> ApplicationResult<Arc<K::Client>> {
        let bound = build(
            &self.provider,
            self.connector.as_ref(),
            &self.endpoint,
            &self.region,
        )
        .await
        .inspect_err(|e| {
            warn!(error = %e, endpoint = %self.endpoint, "object-store client refresh failed");
        })?;
        let client = bound.client.clone();
        *self.current.write().await = bound;
        Ok(client)
    }

    /// The installed client, rebuilt first if it has gone stale.
    ///
    /// # Errors
    ///
    /// Returns the error of [`Self::refresh`] when a rebuild was needed and
    /// failed.
    pub async fn fresh_client(&self) -> ApplicationResult<Arc<K::Client>> {
        if self.is_stale().await {
            self.refresh().await
        } else {
            Ok(self.client().await)
        }
    }
}

async fn build<K: ObjectStoreConnector>(
    provider: &TokenProvider,
    connector: &K,
    endpoint: &str,
    region: &str,
) -> ApplicationResult<Bound<K::Client>> {
    let token = provider.get_valid_token().await?;
    let config = ObjectStoreClientConfig::new(endpoint, region, &token)?;
    let client = connector.connect(&config)?;
    info!(
        endpoint = %config.endpoint,
        region = %config.region,
        expires_at = %token.expires_at(),
        "built object-store client"
    );
    Ok(Bound {
        client: Arc::new(client),
        config,
        token,
    })
}
