//! Clock implementations

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use whisper_core::Timestamp;

/// Source of wall-clock reads
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Operating system wall clock
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Timestamp::from_millis(millis)
    }
}

/// Hand-driven clock for simulations and tests.
/// Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    value: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        ManualClock {
            value: Arc::new(Mutex::new(start)),
        }
    }

    /// Move forward by `dt` and return the new reading
    pub fn advance(&self, dt: Duration) -> Timestamp {
        let mut value = self.value.lock();
        *value = value.saturating_add(dt);
        *value
    }

    /// Jump to `target`. Only moves forward.
    pub fn set(&self, target: Timestamp) {
        let mut value = self.value.lock();
        if target > *value {
            *value = target;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.value.lock()
    }
}

/// Wraps a clock so reads never go backwards.
/// INVARIANT: successive reads are non-decreasing
#[derive(Debug)]
pub struct MonotonicClock<C> {
    inner: C,
    high_water: Mutex<Timestamp>,
}

impl<C: Clock> MonotonicClock<C> {
    pub fn new(inner: C) -> Self {
        MonotonicClock {
            inner,
            high_water: Mutex::new(Timestamp::MIN),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: Clock> Clock for MonotonicClock<C> {
    fn now(&self) -> Timestamp {
        let reading = self.inner.now();
        let mut high_water = self.high_water.lock();
        if reading > *high_water {
            *high_water = reading;
        }
        *high_water
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Scripted(Mutex<Vec<i64>>);

    impl Clock for Scripted {
        fn now(&self) -> Timestamp {
            Timestamp::from_millis(self.0.lock().remove(0))
        }
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(Timestamp::from_secs(5));
        let other = clock.clone();

        clock.advance(Duration::from_secs(10));
        assert_eq!(other.now(), Timestamp::from_secs(15));
    }

    #[test]
    fn test_manual_clock_set_only_forward() {
        let clock = ManualClock::new(Timestamp::from_secs(100));
        clock.set(Timestamp::from_secs(50));
        assert_eq!(clock.now(), Timestamp::from_secs(100));

        clock.set(Timestamp::from_secs(150));
        assert_eq!(clock.now(), Timestamp::from_secs(150));
    }

    #[test]
    fn test_monotonic_clock_hides_backward_jump() {
        let clock = MonotonicClock::new(Scripted(Mutex::new(vec![100, 50, 200])));
        assert_eq!(clock.now().as_millis(), 100);
        assert_eq!(clock.now().as_millis(), 100);
        assert_eq!(clock.now().as_millis(), 200);
    }

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(a.as_millis() > 0);
        assert!(b >= a);
    }

    proptest! {
        #[test]
        fn prop_manual_clock_never_decreases(
            steps in prop::collection::vec((any::<bool>(), 0i64..10_000_000), 1..64)
        ) {
            let clock = ManualClock::new(Timestamp::from_secs(1_000));
            let mut last = clock.now();
            for (jump, amount) in steps {
                if jump {
                    clock.set(Timestamp::from_millis(amount));
                } else {
                    clock.advance(Duration::from_millis(amount as u64));
                }
                let now = clock.now();
                prop_assert!(now >= last);
                last = now;
            }
        }

        #[test]
        fn prop_monotonic_clock_tracks_running_max(
            readings in prop::collection::vec(-1_000_000i64..1_000_000, 1..64)
        ) {
            let clock = MonotonicClock::new(Scripted(Mutex::new(readings.clone())));
            let mut max = i64::MIN;
            for reading in readings {
                max = max.max(reading);
                prop_assert_eq!(clock.now().as_millis(), max);
            }
        }
    }
}
