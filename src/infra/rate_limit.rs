//! In-memory fixed-window rate limiter.
//!
//! Per-process only: counters live in a plain mutex-guarded map and do not
//! coordinate across instances behind a load balancer.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Window {
    started: Instant,
    count: u64,
}

/// Fixed-window counter keyed by client identifier.
pub struct RateLimiter {
    max_requests: u64,
    window: Duration,
    counters: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u64, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_seconds),
            counters: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_requests(&self) -> u64 {
        self.max_requests
    }

    pub fn window_seconds(&self) -> u64 {
        self.window.as_secs()
    }

    /// Record a hit for `key` and report `(count, allowed)` for the current
    /// window.
    pub fn check(&self, key: &str) -> (u64, bool) {
        let now = Instant::now();
        let mut counters = self.counters.lock().unwrap_or_else(|e| e.into_inner());

        // Opportunistic cleanup keeps the map from growing unboundedly
        if counters.len() > 10_000 {
            let window = self.window;
            counters.retain(|_, w| now.duration_since(w.started) < window);
        }

        let entry = counters.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        entry.count += 1;
        (entry.count, entry.count <= self.max_requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit_then_blocks() {
        let limiter = RateLimiter::new(3, 60);

        for i in 1..=3 {
            let (count, allowed) = limiter.check("1.2.3.4");
            assert_eq!(count, i);
            assert!(allowed);
        }

        let (_, allowed) = limiter.check("1.2.3.4");
        assert!(!allowed);
    }

    #[test]
    fn clients_are_tracked_independently() {
        let limiter = RateLimiter::new(1, 60);

        assert!(limiter.check("a").1);
        assert!(!limiter.check("a").1);
        assert!(limiter.check("b").1);
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::new(1, 0);

        assert!(limiter.check("a").1);
        // Zero-length window: every call starts a fresh window
        assert!(limiter.check("a").1);
    }
}
