//! Uniform-spacing rate limiter shared by every upstream call.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{sleep_until, Instant};

/// Spaces calls `window / quota` apart so at most `quota` calls start per window.
///
/// Calls are never bursted: even after an idle period only one call proceeds
/// immediately. A limiter with a non-positive quota never blocks.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Option<Duration>,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(quota: i64, window: Duration) -> Self {
        let interval = u32::try_from(quota)
            .ok()
            .filter(|quota| *quota > 0)
            .map(|quota| {
                let interval = window / quota;
                if interval.is_zero() {
                    Duration::from_secs(1)
                } else {
                    interval
                }
            });
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    /// A limiter that never delays.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    #[must_use]
    pub const fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Wait until the next call may be issued.
    pub async fn acquire(&self) {
        let Some(interval) = self.interval else {
            return;
        };
        let slot = {
            let mut next = self.next_slot.lock();
            let now = Instant::now();
            let slot = match *next {
                Some(reserved) if reserved > now => reserved,
                _ => now,
            };
            *next = Some(slot + interval);
            slot
        };
        sleep_until(slot).await;
    }
}
