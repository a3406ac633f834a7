//! Request spacing for the provider's per-minute quota.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::info;

/// Enforces a minimum interval between consecutive requests.
///
/// Callers queue on the internal lock, so concurrent fetches go out one
/// interval apart.
#[derive(Debug)]
pub struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    /// Creates a limiter with the given minimum interval.
    #[must_use]
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::const_new(None),
            min_interval,
        }
    }

    /// Creates a limiter allowing `requests_per_minute` requests per minute.
    ///
    /// Zero disables limiting.
    #[must_use]
    pub fn per_minute(requests_per_minute: u32) -> Self {
        let min_interval = if requests_per_minute == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(60) / requests_per_minute
        };
        Self::new(min_interval)
    }

    /// Returns the minimum interval between requests.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until the next request may be sent, then records it.
    pub async fn wait(&self) {
        let mut last_request = self.last_request.lock().await;
        if let Some(last) = *last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let delay = self.min_interval - elapsed;
                info!(delay_ms = delay.as_millis() as u64, "Rate limiting: waiting");
                sleep(delay).await;
            }
        }
        *last_request = Some(Instant::now());
    }
}
