//! Typed calls against the resource-manager and IAM account APIs.
//!
//! Each call fetches its bearer token through the client factory. A 401 from
//! the API drops the cached token so the next call exchanges again; the
//! failing call itself is not repeated.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use ycs3_application::{ApplicationResult, AuthenticatedClientFactory};
use ycs3_domain::settings::{DEFAULT_IAM_API_ENDPOINT, DEFAULT_RESOURCE_MANAGER_ENDPOINT};
use ycs3_domain::{DownstreamApiError, HttpMethod};

use super::ReqwestResourceClient;
use crate::object_store::ReqwestObjectStoreConnector;

/// Client factory wired to the reqwest object-store connector.
pub type ClientFactory = AuthenticatedClientFactory<ReqwestObjectStoreConnector>;

/// A cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cloud {
    /// Cloud id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Creation timestamp as reported.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// A folder inside a cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Folder id.
    pub id: String,
    /// Owning cloud.
    #[serde(default)]
    pub cloud_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Lifecycle status, e.g. `ACTIVE`.
    #[serde(default)]
    pub status: Option<String>,
}

/// Passport details of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassportAccount {
    /// Login.
    #[serde(default)]
    pub login: String,
    /// Default email.
    #[serde(default)]
    pub default_email: Option<String>,
}

/// An IAM user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    /// Account id.
    pub id: String,
    /// Passport details, when the account is a passport account.
    #[serde(default)]
    pub yandex_passport_user_account: Option<PassportAccount>,
}

/// Resource-management API consumer.
#[derive(Clone)]
pub struct ResourceManagerClient {
    factory: ClientFactory,
    http: ReqwestResourceClient,
    resource_manager_url: String,
    iam_url: String,
}

impl ResourceManagerClient {
    /// Client against the public API endpoints.
    #[must_use]
    pub fn new(factory: ClientFactory, http: ReqwestResourceClient) -> Self {
        Self {
            factory,
            http,
            resource_manager_url: DEFAULT_RESOURCE_MANAGER_ENDPOINT.to_string(),
            iam_url: DEFAULT_IAM_API_ENDPOINT.to_string(),
        }
    }

    /// Overrides the resource-manager base URL.
    #[must_use]
    pub fn with_resource_manager_url(mut self, url: &str) -> Self {
        self.resource_manager_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Overrides the IAM base URL.
    #[must_use]
    pub fn with_iam_url(mut self, url: &str) -> Self {
        self.iam_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Clouds visible to the account.
    ///
    /// # Errors
    ///
    /// Returns the exchange error if no token could be obtained, or a
    /// downstream error if the API call fails.
    pub async fn list_clouds(&self) -> ApplicationResult<Vec<Cloud>> {
        let url = format!("{}/clouds", self.resource_manager_url);
        let value = self.get(&url, &[]).await?;
        Ok(list_field(value, "clouds")?)
    }

    /// Folders of `cloud_id`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_clouds`].
    pub async fn list_folders(&self, cloud_id: &str) -> ApplicationResult<Vec<Folder>> {
        let url = format!("{}/folders", self.resource_manager_url);
        let value = self.get(&url, &[("cloudId", cloud_id)]).await?;
        Ok(list_field(value, "folders")?)
    }

    /// Looks up a passport account by login.
    ///
    /// # Errors
    ///
    /// Same as [`Self::list_clouds`]; an answer without `id` is a decode error.
    pub async fn get_user_by_login(&self, login: &str) -> ApplicationResult<UserAccount> {
        let url = format!("{}/yandexPassportUserAccounts:byLogin", self.iam_url);
        let value = self.get(&url, &[("login", login)]).await?;
        Ok(decode(value)?)
    }

    /// Fetches a user account by id.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_user_by_login`].
    pub async fn get_user_account(&self, id: &str) -> ApplicationResult<UserAccount> {
        let url = format!("{}/userAccounts/{id}", self.iam_url);
        let value = self.get(&url, &[]).await?;
        Ok(decode(value)?)
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> ApplicationResult<Value> {
        let request = self
            .factory
            .build_resource_management_request(HttpMethod::Get, url, None)
            .await?
            .with_query(query.iter().copied());

        match self.http.execute(&request).await {
            Err(e) if e.is_unauthorized() => {
                warn!(url = %url, "API rejected the bearer token; dropping cached token");
                self.factory.provider().invalidate().await;
                Err(e.into())
            }
            result => Ok(result?),
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, DownstreamApiError> {
    serde_json::from_value(value).map_err(|e| DownstreamApiError::Decode(e.to_string()))
}

fn list_field<T: DeserializeOwned>(
    mut value: Value,
    field: &str,
) -> Result<Vec<T>, DownstreamApiError> {
    match value.get_mut(field).map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => decode(items),
    }
}
