//! Object-store client construction port

use ycs3_domain::{ConfigurationError, ObjectStoreClientConfig};

/// Port for constructing an object-store client.
///
/// The underlying client library binds credentials at construction time and
/// keeps them for its whole lifetime, so a client is never updated in place:
/// a new token means a new client.
pub trait ObjectStoreConnector: Send + Sync {
    /// The client type produced by this connector.
    type Client: Send + Sync;

    /// Builds a client bound to the credentials in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the parameters cannot produce a client.
    fn connect(&self, config: &ObjectStoreClientConfig) -> Result<Self::Client, ConfigurationError>;
}
