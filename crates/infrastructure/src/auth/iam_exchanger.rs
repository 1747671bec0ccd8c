//! Credential exchange against the cloud IAM token endpoint.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;
use ycs3_application::CredentialExchanger;
use ycs3_domain::request::parse_http_url;
use ycs3_domain::{ConfigurationError, ExchangeError, LongLivedCredential, TokenValue};

use crate::http::{Timeouts, build_http_client, error_message};

/// Request field carrying the long-lived OAuth token.
///
/// The production IAM endpoint reads this name. Use
/// [`IamTokenExchanger::with_secret_field`] with `"oauthToken"` for
/// authorities that expect the short form.
pub const DEFAULT_SECRET_FIELD: &str = "yandexPassportOauthToken";

/// Successful exchange answer. `expiresAt` is reported by the authority but
/// the lifetime is computed locally from the issue time.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IamTokenResponse {
    #[serde(default)]
    iam_token: Option<String>,
    #[serde(default)]
    expires_at: Option<String>,
}

/// Exchanges the long-lived credential with a single JSON POST.
///
/// The exchanger never retries; retry policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct IamTokenExchanger {
    client: Client,
    endpoint: Url,
    secret_field: String,
}

impl IamTokenExchanger {
    /// Creates an exchanger for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a non-HTTP endpoint or if the HTTP
    /// client cannot be built.
    pub fn new(endpoint: &str, timeouts: Timeouts) -> Result<Self, ConfigurationError> {
        let client = build_http_client(timeouts, HeaderMap::new())?;
        Self::with_client(endpoint, client)
    }

    /// Creates an exchanger reusing an existing reqwest client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidUrl`] for a non-HTTP endpoint.
    pub fn with_client(endpoint: &str, client: Client) -> Result<Self, ConfigurationError> {
        Ok(Self {
            client,
            endpoint: parse_http_url(endpoint)?,
            secret_field: DEFAULT_SECRET_FIELD.to_string(),
        })
    }

    /// Overrides the request field name holding the secret.
    #[must_use]
    pub fn with_secret_field(mut self, field: impl Into<String>) -> Self {
        self.secret_field = field.into();
        self
    }

    /// The exchange endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request_body(&self, secret: &LongLivedCredential) -> Value {
        let mut body = Map::new();
        body.insert(
            self.secret_field.clone(),
            Value::String(secret.expose().to_string()),
        );
        Value::Object(body)
    }
}

#[async_trait]
impl CredentialExchanger for IamTokenExchanger {
    async fn exchange(&self, secret: &LongLivedCredential) -> Result<TokenValue, ExchangeError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&self.request_body(secret))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(ExchangeError::Rejected {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let parsed: IamTokenResponse = serde_json::from_str(&text)
            .map_err(|e| ExchangeError::MalformedResponse(e.to_string()))?;
        let token = parsed
            .iam_token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ExchangeError::MalformedResponse("missing iamToken".to_string()))?;

        debug!(reported_expires_at = parsed.expires_at.as_deref(), "IAM token issued");
        Ok(TokenValue::new(token))
    }
}

fn map_transport_error(e: reqwest::Error) -> ExchangeError {
    if e.is_timeout() {
        ExchangeError::Timeout
    } else {
        ExchangeError::Network(e.to_string())
    }
}
