//! Authenticated requests for the resource-management API

mod method;

pub use method::HttpMethod;

use serde_json::Value;
use url::Url;

use crate::error::ConfigurationError;
use crate::token::ShortLivedToken;

/// Name of the header that carries the bearer token.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// A request that already carries a bearer token.
///
/// Built fresh for every call, so it is correct by construction as long as the
/// token came from a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute target URL.
    pub url: Url,
    /// Headers in insertion order, the bearer header first.
    pub headers: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<Value>,
}

impl AuthenticatedRequest {
    /// Builds a request for `url` authorized with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidUrl`] if `url` does not parse or
    /// is not `http`/`https`, and [`ConfigurationError::BodyNotAllowed`] for a
    /// body on GET, HEAD or DELETE.
    pub fn new(
        method: HttpMethod,
        url: &str,
        token: &ShortLivedToken,
        body: Option<Value>,
    ) -> Result<Self, ConfigurationError> {
        if body.is_some() && !method.accepts_body() {
            return Err(ConfigurationError::BodyNotAllowed(method.to_string()));
        }
        let url = parse_http_url(url)?;
        let mut headers = vec![(AUTHORIZATION_HEADER.to_string(), token.bearer_header())];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        Ok(Self {
            method,
            url,
            headers,
            body,
        })
    }

    /// Appends query parameters to the URL.
    #[must_use]
    pub fn with_query<'a>(mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_some() {
            self.url.query_pairs_mut().extend_pairs(pairs);
        }
        self
    }

    /// Looks up a header value, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Parses an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns [`ConfigurationError::InvalidUrl`] for anything else.
pub fn parse_http_url(raw: &str) -> Result<Url, ConfigurationError> {
    let url = Url::parse(raw).map_err(|e| ConfigurationError::InvalidUrl(format!("{e}: {raw}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigurationError::InvalidUrl(format!(
            "unsupported scheme {other}: {raw}"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::credential::TokenValue;
    use crate::token::TokenPolicy;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn token() -> ShortLivedToken {
        ShortLivedToken::issue(TokenValue::new("T1"), Utc::now(), &TokenPolicy::default())
    }

    #[test]
    fn test_request_carries_bearer() {
        let request = AuthenticatedRequest::new(
            HttpMethod::Get,
            "https://resource-manager.api.cloud.yandex.net/resource-manager/v1/clouds",
            &token(),
            None,
        )
        .unwrap();

        assert_eq!(request.header("authorization"), Some("Bearer T1"));
        assert_eq!(request.header("Content-Type"), None);
    }

    #[test]
    fn test_body_adds_content_type() {
        let request = AuthenticatedRequest::new(
            HttpMethod::Post,
            "https://storage.api.cloud.yandex.net/storage/v1/buckets",
            &token(),
            Some(json!({"name": "b", "folderId": "f"})),
        )
        .unwrap();

        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.headers[0].1, "Bearer T1");
    }

    #[test]
    fn test_body_rejected_for_bodyless_methods() {
        for method in [HttpMethod::Get, HttpMethod::Head, HttpMethod::Delete] {
            let result = AuthenticatedRequest::new(
                method,
                "https://example.test/buckets",
                &token(),
                Some(json!({"name": "b"})),
            );
            assert_eq!(
                result,
                Err(ConfigurationError::BodyNotAllowed(method.as_str().to_string()))
            );
        }
    }

    #[test]
    fn test_query_pairs_are_encoded() {
        let request = AuthenticatedRequest::new(
            HttpMethod::Get,
            "https://example.test/folders",
            &token(),
            None,
        )
        .unwrap()
        .with_query([("cloudId", "b1g a")]);

        assert_eq!(
            request.url.as_str(),
            "https://example.test/folders?cloudId=b1g+a"
        );
    }

    #[test]
    fn test_rejects_non_http_url() {
        assert!(matches!(
            AuthenticatedRequest::new(HttpMethod::Get, "ftp://example.test", &token(), None),
            Err(ConfigurationError::InvalidUrl(_))
        ));
        assert!(parse_http_url("not a url").is_err());
    }
}
