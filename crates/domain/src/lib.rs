//! ycs3 Domain - Core credential types
//!
//! This crate defines the domain model for exchanging a long-lived cloud
//! credential for short-lived tokens. All types here are pure Rust with no
//! I/O dependencies.

pub mod credential;
pub mod error;
pub mod object_store;
pub mod request;
pub mod settings;
pub mod token;

pub use credential::{LongLivedCredential, TokenValue};
pub use error::{ConfigurationError, DownstreamApiError, ExchangeError};
pub use object_store::{ObjectStoreClientConfig, ObjectStoreCredentials};
pub use request::{AuthenticatedRequest, HttpMethod};
pub use settings::Settings;
pub use token::{ShortLivedToken, TokenPolicy};
