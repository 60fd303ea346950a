//! Monotonic game clock.

use tokio::time::Instant;

use puzzle_core::Timestamp;

/// Converts tokio's monotonic clock into puzzle timestamps.
///
/// Built on `tokio::time::Instant` so paused-time tests drive it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Clock {
    origin: Instant,
}

impl Clock {
    pub(crate) fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub(crate) fn now(&self) -> Timestamp {
        let elapsed = self.origin.elapsed().as_millis();
        Timestamp::from_millis(u64::try_from(elapsed).unwrap_or(u64::MAX))
    }
}
