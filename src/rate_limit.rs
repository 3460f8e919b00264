use std::time::{Duration, Instant};

use dashmap::DashMap;

const LOGIN_WINDOW: Duration = Duration::from_secs(15 * 60);
const LOGIN_MAX_ATTEMPTS: u32 = 5;
/// Tracked emails above which stale entries are swept on the next attempt.
const SWEEP_THRESHOLD: usize = 10_000;

/// Per-email sign-in brute force limiter.
pub struct LoginRateLimiter {
    /// email -> (attempt_count, window_start)
    entries: DashMap<String, (u32, Instant)>,
    max_attempts: u32,
    window: Duration,
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginRateLimiter {
    /// 5 attempts per 15 minutes.
    pub fn new() -> Self {
        Self::with_limits(LOGIN_MAX_ATTEMPTS, LOGIN_WINDOW)
    }

    pub fn with_limits(max_attempts: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_attempts,
            window,
        }
    }

    /// Count a sign-in attempt, or refuse it with the seconds left in the window.
    /// Check and increment happen under the entry lock, so concurrent attempts
    /// cannot get past the limit. Call `reset()` after a successful sign-in.
    pub fn try_attempt(&self, email: &str) -> Result<(), u64> {
        if self.entries.len() >= SWEEP_THRESHOLD {
            self.cleanup();
        }

        let now = Instant::now();
        let mut entry = self.entries.entry(email.to_lowercase()).or_insert((0, now));
        let (count, start) = entry.value_mut();

        if now.duration_since(*start) > self.window {
            *count = 0;
            *start = now;
        }

        if *count >= self.max_attempts {
            let elapsed = now.duration_since(*start).as_secs();
            return Err(self.window.as_secs().saturating_sub(elapsed));
        }

        *count += 1;
        Ok(())
    }

    /// Forget attempts for an email after a successful sign-in.
    pub fn reset(&self, email: &str) {
        self.entries.remove(&email.to_lowercase());
    }

    /// Drop entries whose window has passed.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let window = self.window;
        self.entries
            .retain(|_, (_, start)| now.duration_since(*start) <= window);
    }

    pub fn tracked(&self) -> usize {
        self.entries.len()
    }
}
