//! Fixed-delay pacing for calls to the external board API.
//!
//! A `Pacer` admits one call per period. The first call goes through
//! immediately; each following call waits until a full period has passed
//! since the previous one.

use governor::{Quota, RateLimiter};
use std::sync::Arc;
use std::time::Duration;

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

#[derive(Clone)]
pub struct Pacer {
    limiter: Option<Arc<DirectRateLimiter>>,
    period: Duration,
}

impl Pacer {
    /// One call per `period`. A zero period disables pacing.
    pub fn new(period: Duration) -> Self {
        let limiter = Quota::with_period(period).map(|quota| Arc::new(RateLimiter::direct(quota)));
        Self { limiter, period }
    }

    /// No delay between calls.
    pub fn unpaced() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Wait for the next slot.
    pub async fn ready(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer").field("period", &self.period).finish()
    }
}
