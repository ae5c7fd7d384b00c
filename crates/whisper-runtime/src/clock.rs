//! Runtime clock backed by the async runtime's timer

use tokio::time::Instant;
use whisper_core::Timestamp;
use whisper_time::{Clock, SystemClock};

/// Wall-clock reading that advances with `tokio::time::Instant`.
///
/// Anchored to the system clock once at construction, then driven by the
/// monotonic instant, so reads never go backwards and paused-time tests can
/// move it with `tokio::time::advance`.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeClock {
    origin: Instant,
    origin_wall: Timestamp,
}

impl RuntimeClock {
    pub fn new() -> Self {
        Self::anchored_at(SystemClock.now())
    }

    pub fn anchored_at(origin_wall: Timestamp) -> Self {
        RuntimeClock {
            origin: Instant::now(),
            origin_wall,
        }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for RuntimeClock {
    fn now(&self) -> Timestamp {
        self.origin_wall + self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_follows_paused_time() {
        let clock = RuntimeClock::anchored_at(Timestamp::from_secs(1_000));
        assert_eq!(clock.now(), Timestamp::from_secs(1_000));

        tokio::time::advance(Duration::from_secs(90)).await;
        assert_eq!(clock.now(), Timestamp::from_secs(1_090));
    }
}
