//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the token core and external systems.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod clock;
mod exchanger;
mod object_store;

pub use clock::{Clock, ManualClock};
pub use exchanger::CredentialExchanger;
pub use object_store::ObjectStoreConnector;
