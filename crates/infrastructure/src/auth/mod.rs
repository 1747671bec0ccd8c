//! Credential exchange adapters.

mod iam_exchanger;

pub use iam_exchanger::{DEFAULT_SECRET_FIELD, IamTokenExchanger};
