//! ycs3 Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus settings loading and the
//! resource-management API consumer.

pub mod adapters;
pub mod auth;
pub mod config;
pub mod http;
pub mod object_store;
pub mod services;

pub use adapters::SystemClock;
pub use auth::IamTokenExchanger;
pub use config::{ENV_PREFIX, SettingsLoader, default_config_path};
pub use http::{
    ClientFactory, Cloud, Folder, ReqwestResourceClient, ResourceManagerClient, Timeouts,
    UserAccount,
};
pub use object_store::{ObjectStoreClient, ReqwestObjectStoreConnector};
pub use services::Ycs3Services;
