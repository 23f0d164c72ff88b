//! Process-wide minimum spacing between outbound geocoder requests.
//!
//! One [`RateLimiter`] is built at startup and shared (behind an `Arc`) by
//! every caller. Acquisitions are serialized by an async mutex that is held
//! across the wait, so concurrent callers queue instead of racing past the
//! timestamp check.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::clock::{Clock, TokioClock};

pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    min_interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("min_interval", &self.min_interval)
            .finish_non_exhaustive()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(Self::MIN_INTERVAL)
    }
}

impl RateLimiter {
    /// Spacing required by the public Nominatim usage policy.
    pub const MIN_INTERVAL: Duration = Duration::from_millis(2000);

    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self::with_clock(min_interval, Arc::new(TokioClock))
    }

    #[must_use]
    pub fn with_clock(min_interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            min_interval,
            last: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until at least `min_interval` has passed since the previous
    /// acquisition, then records the current time as the new one.
    pub async fn acquire(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            let elapsed = self.clock.now().saturating_duration_since(previous);
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                    "waiting for geocoder rate limit"
                );
                self.clock.sleep(wait).await;
            }
        }
        *last = Some(self.clock.now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn limiter(interval_ms: u64) -> (Arc<ManualClock>, RateLimiter) {
        let clock = Arc::new(ManualClock::new());
        let limiter = RateLimiter::with_clock(Duration::from_millis(interval_ms), clock.clone());
        (clock, limiter)
    }

    #[tokio::test]
    async fn first_acquire_does_not_wait() {
        let (clock, limiter) = limiter(2000);
        limiter.acquire().await;
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn consecutive_acquires_are_spaced_by_min_interval() {
        let (clock, limiter) = limiter(2000);
        let n = 5_u32;
        for _ in 0..n {
            limiter.acquire().await;
        }
        assert!(clock.elapsed() >= Duration::from_millis(2000) * (n - 1));
    }

    #[tokio::test]
    async fn elapsed_time_counts_toward_interval() {
        let (clock, limiter) = limiter(2000);
        limiter.acquire().await;
        clock.advance(Duration::from_millis(1500));
        limiter.acquire().await;
        assert_eq!(clock.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn no_wait_after_interval_has_passed() {
        let (clock, limiter) = limiter(2000);
        limiter.acquire().await;
        clock.advance(Duration::from_secs(5));
        limiter.acquire().await;
        assert_eq!(clock.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn concurrent_acquirers_queue() {
        let (clock, limiter) = limiter(2000);
        let (clock, limiter) = (&clock, &limiter);
        let acquisitions = (0..4).map(|_| async move {
            limiter.acquire().await;
            clock.now()
        });
        let mut times = futures::future::join_all(acquisitions).await;
        times.sort();
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(2000));
        }
        assert!(clock.elapsed() >= Duration::from_millis(6000));
    }

    #[test]
    fn default_uses_two_second_interval() {
        assert_eq!(RateLimiter::default().min_interval(), Duration::from_secs(2));
    }
}
