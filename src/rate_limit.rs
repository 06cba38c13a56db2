use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// In-memory sliding-window rate limiter keyed by "bucket:user".
/// Each bucket (e.g. "generate", "brand_voice") has its own max attempts and window.
pub struct RateLimiter {
    entries: Mutex<HashMap<String, Vec<Instant>>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        RateLimiter {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Record an attempt and return true if the attempt is allowed (under the limit).
    /// `key` should be something like "generate:<user_id>".
    pub fn check_and_record(&self, key: &str, max_attempts: u64, window: Duration) -> bool {
        let mut map = match self.entries.lock() {
            Ok(m) => m,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();

        let attempts = map.entry(key.to_string()).or_default();

        // Prune old entries outside the window
        attempts.retain(|t| now.duration_since(*t) < window);

        if (attempts.len() as u64) < max_attempts {
            attempts.push(now);
            true
        } else {
            false
        }
    }

    /// Check remaining attempts without recording a new one.
    pub fn remaining(&self, key: &str, max_attempts: u64, window: Duration) -> u64 {
        let map = match self.entries.lock() {
            Ok(m) => m,
            Err(poisoned) => poisoned.into_inner(),
        };
        let now = Instant::now();
        let used = map
            .get(key)
            .map(|attempts| {
                attempts
                    .iter()
                    .filter(|t| now.duration_since(**t) < window)
                    .count() as u64
            })
            .unwrap_or(0);

        max_attempts.saturating_sub(used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit() {
        let rl = RateLimiter::new();
        let window = Duration::from_secs(3600);
        assert!(rl.check_and_record("generate:1", 2, window));
        assert!(rl.check_and_record("generate:1", 2, window));
        assert!(!rl.check_and_record("generate:1", 2, window));
        assert_eq!(rl.remaining("generate:1", 2, window), 0);
    }

    #[test]
    fn keys_are_independent() {
        let rl = RateLimiter::new();
        let window = Duration::from_secs(3600);
        assert!(rl.check_and_record("generate:1", 1, window));
        assert!(rl.check_and_record("generate:2", 1, window));
        assert!(rl.check_and_record("brand_voice:1", 1, window));
        assert_eq!(rl.remaining("generate:3", 5, window), 5);
    }

    #[test]
    fn zero_window_forgets_immediately() {
        let rl = RateLimiter::new();
        assert!(rl.check_and_record("k", 1, Duration::ZERO));
        assert!(rl.check_and_record("k", 1, Duration::ZERO));
    }
}
