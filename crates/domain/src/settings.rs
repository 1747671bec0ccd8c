//! Client settings
//!
//! Plain data; loading from files and the environment lives in the
//! infrastructure layer.

use serde::{Deserialize, Serialize};

use crate::credential::LongLivedCredential;
use crate::error::ConfigurationError;
use crate::object_store::{DEFAULT_ENDPOINT, DEFAULT_REGION};

/// Default credential exchange endpoint.
pub const DEFAULT_IAM_ENDPOINT: &str = "https://iam.api.cloud.yandex.net/iam/v1/tokens";

/// Default resource-manager API base.
pub const DEFAULT_RESOURCE_MANAGER_ENDPOINT: &str =
    "https://resource-manager.api.cloud.yandex.net/resource-manager/v1";

/// Default IAM API base for account lookups.
pub const DEFAULT_IAM_API_ENDPOINT: &str = "https://iam.api.cloud.yandex.net/iam/v1";

/// Settings for the whole client stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Long-lived OAuth token.
    pub oauth_token: Option<String>,
    /// Default bucket for object operations.
    pub bucket: Option<String>,
    /// Object-store endpoint.
    pub endpoint: String,
    /// Object-store region.
    pub region: String,
    /// Credential exchange endpoint.
    pub iam_endpoint: String,
    /// Resource-manager API base.
    pub resource_manager_endpoint: String,
    /// IAM API base for account lookups.
    pub iam_api_endpoint: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    /// Connect timeout in seconds.
    pub connect_timeout: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            oauth_token: None,
            bucket: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            region: DEFAULT_REGION.to_string(),
            iam_endpoint: DEFAULT_IAM_ENDPOINT.to_string(),
            resource_manager_endpoint: DEFAULT_RESOURCE_MANAGER_ENDPOINT.to_string(),
            iam_api_endpoint: DEFAULT_IAM_API_ENDPOINT.to_string(),
            timeout: 30,
            connect_timeout: 10,
        }
    }
}

impl Settings {
    /// The configured long-lived credential.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingSetting`] when no token is set and
    /// [`ConfigurationError::EmptyCredential`] when it is blank.
    pub fn credential(&self) -> Result<LongLivedCredential, ConfigurationError> {
        let token = self
            .oauth_token
            .as_deref()
            .ok_or_else(|| ConfigurationError::MissingSetting("oauth_token".to_string()))?;
        LongLivedCredential::new(token)
    }
}
