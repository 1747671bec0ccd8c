//! Shared reqwest plumbing.

mod resource_client;
mod resource_manager;

pub use resource_client::ReqwestResourceClient;
pub use resource_manager::{
    ClientFactory, Cloud, Folder, PassportAccount, ResourceManagerClient, UserAccount,
};
pub(crate) use resource_client::error_message;

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use ycs3_domain::{ConfigurationError, HttpMethod, Settings};

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("ycs3/", env!("CARGO_PKG_VERSION"));

/// Request and connect timeouts applied to every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Whole-request timeout.
    pub request: Duration,
    /// TCP/TLS connect timeout.
    pub connect: Duration,
}

impl Timeouts {
    /// Timeouts taken from settings (seconds).
    #[must_use]
    pub const fn from_settings(settings: &Settings) -> Self {
        Self {
            request: Duration::from_secs(settings.timeout),
            connect: Duration::from_secs(settings.connect_timeout),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(30),
            connect: Duration::from_secs(10),
        }
    }
}

/// Builds a reqwest client with the crate's defaults.
///
/// # Errors
///
/// Returns [`ConfigurationError::ClientBuild`] if reqwest cannot build it.
pub fn build_http_client(
    timeouts: Timeouts,
    default_headers: HeaderMap,
) -> Result<Client, ConfigurationError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeouts.request)
        .connect_timeout(timeouts.connect)
        .default_headers(default_headers)
        .build()
        .map_err(|e| ConfigurationError::ClientBuild(e.to_string()))
}

/// Converts domain `HttpMethod` to reqwest `Method`.
#[must_use]
pub const fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_timeouts_from_settings() {
        let settings = Settings {
            timeout: 5,
            connect_timeout: 2,
            ..Settings::default()
        };
        assert_eq!(
            Timeouts::from_settings(&settings),
            Timeouts {
                request: Duration::from_secs(5),
                connect: Duration::from_secs(2),
            }
        );
        assert_eq!(
            Timeouts::from_settings(&Settings::default()),
            Timeouts::default()
        );
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_reqwest_method(HttpMethod::Patch), Method::PATCH);
        assert_eq!(to_reqwest_method(HttpMethod::Head), Method::HEAD);
    }
}
