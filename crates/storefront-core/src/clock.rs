//! Clock abstraction.
//!
//! Event timestamps are taken from a `Clock` rather than read directly from
//! the system so tests and simulations can pin them.

use std::sync::Arc;

use chrono::{DateTime, Utc};

/// Source of "now" for event metadata.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic_enough_for_metadata() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();

        assert!(second >= first);
    }

    #[test]
    fn test_shared_clock_delegates() {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let before = Utc::now();

        assert!(clock.now() >= before);
    }
}
