//! Wall-clock adapter for the `Clock` port

use chrono::{DateTime, Utc};
use ycs3_application::ports::Clock;

/// Reads the system UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Creates a new system clock.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_tracks_wall_time() {
        let before = Utc::now();
        let now = SystemClock::new().now();
        let after = Utc::now();
        assert!(before <= now && now <= after);
    }
}
