use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use veridian_core::{RateLimitAction, RateLimitError, RateLimiter};

struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window rate limiter keyed by `(identity, action)`. Counters
/// live in process memory; restarting the service resets them.
#[derive(Clone)]
pub struct FixedWindowRateLimiter {
    windows: Arc<DashMap<(String, RateLimitAction), Window>>,
    window: Duration,
    max_attempts: u32,
}

impl FixedWindowRateLimiter {
    pub fn new(window: Duration, max_attempts: u32) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            window,
            max_attempts,
        }
    }
}

#[async_trait::async_trait]
impl RateLimiter for FixedWindowRateLimiter {
    async fn check(
        &self,
        identity: &str,
        action: RateLimitAction,
    ) -> Result<(), RateLimitError> {
        // Identities are caller-supplied, so elapsed windows must not
        // accumulate. Evicting them here keeps the map bounded by the
        // traffic of a single window.
        self.windows
            .retain(|_, window| window.started_at.elapsed() < self.window);

        let key = (identity.to_string(), action);
        let mut entry = self.windows.entry(key).or_insert_with(|| Window {
            started_at: Instant::now(),
            count: 0,
        });

        let elapsed = entry.started_at.elapsed();
        if elapsed >= self.window {
            entry.started_at = Instant::now();
            entry.count = 0;
        }

        if entry.count >= self.max_attempts {
            return Err(RateLimitError::TooManyRequests {
                retry_after: self.window.saturating_sub(elapsed),
            });
        }

        entry.count += 1;
        Ok(())
    }
}
