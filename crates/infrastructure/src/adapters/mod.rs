//! Adapters for the application ports that need no network.

mod system_clock;

pub use system_clock::SystemClock;
