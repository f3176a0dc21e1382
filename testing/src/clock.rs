//! Manual wall-clock control for deadline tests.

use std::sync::atomic::{AtomicI64, Ordering};

use cfn_resource_sdk::Clock;

/// A [`Clock`] whose current time is set explicitly by the test.
///
/// Handlers can hold a clone of the `Arc<ManualClock>` and advance time
/// mid-execution, which is how the "checkpoint raised after the deadline
/// passed" path is exercised.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_epoch_secs: AtomicI64,
}

impl ManualClock {
    /// Creates a clock reading `now` epoch seconds.
    pub fn at(now: i64) -> Self {
        Self {
            now_epoch_secs: AtomicI64::new(now),
        }
    }

    /// Sets the current time.
    pub fn set(&self, now: i64) {
        self.now_epoch_secs.store(now, Ordering::SeqCst);
    }

    /// Advances the current time by `secs`.
    pub fn advance(&self, secs: i64) {
        self.now_epoch_secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_epoch_secs(&self) -> i64 {
        self.now_epoch_secs.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_advance() {
        let clock = ManualClock::at(100);
        assert_eq!(clock.now_epoch_secs(), 100);
        clock.advance(50);
        assert_eq!(clock.now_epoch_secs(), 150);
        clock.set(10);
        assert_eq!(clock.now_epoch_secs(), 10);
    }
}
