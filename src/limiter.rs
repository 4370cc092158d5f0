//! Per-provider request pacing.
//!
//! Public geocoding services tolerate roughly one request per second. The
//! limiter tracks the last request instant per provider and blocks the
//! calling thread for the remaining delta. State is held behind a mutex so
//! spacing holds even when handlers run in parallel.

use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct RateLimiter {
    last_request: Mutex<HashMap<&'static str, Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until at least `min_interval` has passed since the last request
    /// to `provider_id`, then record the new request instant.
    pub fn wait_if_needed(&self, provider_id: &'static str, min_interval: Duration) {
        let mut last = self.last_request.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = last.get(provider_id) {
            let elapsed = previous.elapsed();
            if elapsed < min_interval {
                let remaining = min_interval - elapsed;
                tracing::debug!(provider = provider_id, ?remaining, "rate limiting");
                // The guard stays held while sleeping so concurrent callers
                // queue up instead of violating the provider interval.
                thread::sleep(remaining);
            }
        }
        last.insert(provider_id, Instant::now());
    }
}
