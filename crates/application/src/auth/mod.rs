//! Authentication core.
//!
//! This module provides:
//! - A single-slot token cache with on-demand expiry
//! - The token provider every outbound call goes through
//! - The factory handing out authenticated clients and requests

mod client_factory;
mod object_store_handle;
mod token_cache;
mod token_provider;

pub use client_factory::AuthenticatedClientFactory;
pub use object_store_handle::ObjectStoreHandle;
pub use token_cache::{TokenCache, TokenStatus};
pub use token_provider::TokenProvider;
