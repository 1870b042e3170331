use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

/// Keeps consecutive outbound calls at least `min_interval` apart.
///
/// Holds a single timeline; callers sharing one instance must serialize access.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl RateLimiter {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(min_interval_ms),
            last_call: None,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(last_call) = self.last_call {
            let elapsed = last_call.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                debug!(wait_ms = remaining.as_millis() as u64, "rate limiter sleeping");
                sleep(remaining).await;
            }
        }
        self.last_call = Some(Instant::now());
    }
}
