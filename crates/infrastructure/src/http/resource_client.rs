//! Executes authenticated resource-management requests with reqwest.

use reqwest::Client;
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::debug;
use ycs3_domain::{AuthenticatedRequest, ConfigurationError, DownstreamApiError};

use super::{Timeouts, build_http_client, to_reqwest_method};

/// Sends [`AuthenticatedRequest`]s and decodes JSON answers.
#[derive(Debug, Clone)]
pub struct ReqwestResourceClient {
    client: Client,
}

impl ReqwestResourceClient {
    /// Creates a client with the given timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the reqwest client cannot be built.
    pub fn new(timeouts: Timeouts) -> Result<Self, ConfigurationError> {
        Ok(Self {
            client: build_http_client(timeouts, HeaderMap::new())?,
        })
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Sends `request` and returns the decoded JSON body (`Null` when empty).
    ///
    /// # Errors
    ///
    /// Returns [`DownstreamApiError`] for transport failures, non-success
    /// statuses and undecodable bodies.
    pub async fn execute(
        &self,
        request: &AuthenticatedRequest,
    ) -> Result<Value, DownstreamApiError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| DownstreamApiError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DownstreamApiError::Network(e.to_string()))?;
        debug!(
            method = %request.method,
            url = %request.url,
            status = status.as_u16(),
            "resource-management call"
        );

        if !status.is_success() {
            return Err(DownstreamApiError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| DownstreamApiError::Decode(e.to_string()))
    }
}

/// Extracts `message` from a cloud API error body, falling back to the text.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
