//! ycs3 Application - Token core and ports
//!
//! This crate defines the application layer with:
//! - Port traits (clock, credential exchange, object-store construction)
//! - Token caching and the refresh policy
//! - The authenticated client factory
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod ports;

#[cfg(test)]
mod test_support;

pub use auth::{
    AuthenticatedClientFactory, ObjectStoreHandle, TokenCache, TokenProvider, TokenStatus,
};
pub use error::{ApplicationError, ApplicationResult};
pub use ports::{Clock, CredentialExchanger, ManualClock, ObjectStoreConnector};
pub use tokio_util::sync::CancellationToken;
