use std::{
    num::NonZeroU32,
    time::{Duration, Instant},
};

use governor::{
    DefaultDirectRateLimiter, Quota,
    clock::{Clock, DefaultClock},
};
use tracing::trace;

/// Enforces a minimum interval between the starts of consecutive requests.
///
/// Wraps a `governor` limiter with a burst of one. Callers that arrive early
/// sleep until the limiter admits them, so concurrent callers are released at
/// least one interval apart. A zero interval disables limiting.
pub struct RateLimiter {
    interval: Duration,
    limiter: Option<DefaultDirectRateLimiter>,
    clock: DefaultClock,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("interval", &self.interval)
            .field("enabled", &self.limiter.is_some())
            .finish()
    }
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval)
            .map(|quota| governor::RateLimiter::direct(quota.allow_burst(NonZeroU32::MIN)));

        Self {
            interval,
            limiter,
            clock: DefaultClock::default(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until a request may start and return the instant it was granted.
    pub fn wait(&self) -> Instant {
        if let Some(limiter) = &self.limiter {
            while let Err(not_until) = limiter.check() {
                let pause = not_until.wait_time_from(self.clock.now());
                trace!(pause_ms = pause.as_millis(), "Rate limiting request");
                std::thread::sleep(pause);
            }
        }
        Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // Grant instants are read from the std clock just after the limiter's own
    // clock admitted the call.
    const SKEW: Duration = Duration::from_millis(2);

    #[test]
    fn test_first_request_is_not_delayed() {
        let limiter = RateLimiter::new(Duration::from_secs(10));
        let before = Instant::now();
        limiter.wait();
        assert!(before.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_sequential_requests_are_spaced() {
        let interval = Duration::from_millis(40);
        let limiter = RateLimiter::new(interval);
        let first = limiter.wait();
        let second = limiter.wait();
        let third = limiter.wait();
        assert!(second - first >= interval - SKEW);
        assert!(third - second >= interval - SKEW);
        assert!(third - first >= 2 * interval - SKEW);
    }

    #[test]
    fn test_zero_interval_never_blocks() {
        let limiter = RateLimiter::new(Duration::ZERO);
        assert_eq!(limiter.interval(), Duration::ZERO);
        let before = Instant::now();
        for _ in 0..100 {
            limiter.wait();
        }
        assert!(before.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_concurrent_callers_share_one_cadence() {
        let interval = Duration::from_millis(30);
        let limiter = Arc::new(RateLimiter::new(interval));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || limiter.wait())
            })
            .collect();

        let mut starts: Vec<Instant> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        starts.sort();

        for pair in starts.windows(2) {
            assert!(
                pair[1] - pair[0] >= interval - SKEW,
                "requests started {:?} apart",
                pair[1] - pair[0]
            );
        }
        assert!(starts[3] - starts[0] >= 3 * interval - SKEW);
    }
}
