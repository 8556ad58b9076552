//! Failed-login rate limiting: 5 failures within 5 minutes locks the
//! account out for 15 minutes.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Attempt counter to lockout decision, per username
///
/// Methods take an explicit `now` so tests are deterministic; the
/// `Instant::now()` wrappers are what callers use.
#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: usize,
    window: Duration,
    lockout: Duration,
    attempts: HashMap<String, Vec<Instant>>,
    lockouts: HashMap<String, Instant>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window: Duration::from_secs(5 * 60),
            lockout: Duration::from_secs(15 * 60),
            attempts: HashMap::new(),
            lockouts: HashMap::new(),
        }
    }
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration, lockout: Duration) -> Self {
        Self {
            max_attempts,
            window,
            lockout,
            ..Self::default()
        }
    }

    /// Remaining lockout time, or `None` when the user may attempt
    pub fn locked_out(&mut self, username: &str) -> Option<Duration> {
        self.locked_out_at(username, Instant::now())
    }

    pub fn locked_out_at(&mut self, username: &str, now: Instant) -> Option<Duration> {
        match self.lockouts.get(username) {
            Some(&until) if now < until => Some(until - now),
            Some(_) => {
                // Lockout expired: forget it and the attempts behind it
                self.lockouts.remove(username);
                self.attempts.remove(username);
                None
            }
            None => None,
        }
    }

    /// Records a failed attempt; returns the lockout duration when this
    /// failure tripped the limit
    pub fn record_failure(&mut self, username: &str) -> Option<Duration> {
        self.record_failure_at(username, Instant::now())
    }

    pub fn record_failure_at(&mut self, username: &str, now: Instant) -> Option<Duration> {
        let attempts = self.attempts.entry(username.to_string()).or_default();
        attempts.retain(|&at| now.saturating_duration_since(at) <= self.window);
        attempts.push(now);

        if attempts.len() >= self.max_attempts {
            self.lockouts.insert(username.to_string(), now + self.lockout);
            return Some(self.lockout);
        }
        None
    }

    /// Clears a user's failure history after a successful login
    pub fn reset(&mut self, username: &str) {
        self.attempts.remove(username);
        self.lockouts.remove(username);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locks_after_five_failures_in_window() {
        let mut limiter = RateLimiter::default();
        let start = Instant::now();

        for i in 0..4 {
            let tripped = limiter.record_failure_at("alice", start + Duration::from_secs(i));
            assert!(tripped.is_none(), "locked too early at attempt {}", i + 1);
        }
        let tripped = limiter.record_failure_at("alice", start + Duration::from_secs(4));
        assert_eq!(tripped, Some(Duration::from_secs(15 * 60)));
        assert!(limiter
            .locked_out_at("alice", start + Duration::from_secs(5))
            .is_some());
    }

    #[test]
    fn test_old_failures_fall_out_of_window() {
        let mut limiter = RateLimiter::default();
        let start = Instant::now();

        for i in 0..4 {
            limiter.record_failure_at("bob", start + Duration::from_secs(i));
        }
        // Fifth failure well past the 5-minute window: earlier ones no
        // longer count
        let late = start + Duration::from_secs(6 * 60);
        assert!(limiter.record_failure_at("bob", late).is_none());
        assert!(limiter.locked_out_at("bob", late).is_none());
    }

    #[test]
    fn test_lockout_expires() {
        let mut limiter = RateLimiter::default();
        let start = Instant::now();

        for _ in 0..5 {
            limiter.record_failure_at("carol", start);
        }
        assert!(limiter.locked_out_at("carol", start).is_some());

        let after = start + Duration::from_secs(15 * 60 + 1);
        assert!(limiter.locked_out_at("carol", after).is_none());
        // History was cleared with the expiry
        assert!(limiter.record_failure_at("carol", after).is_none());
    }

    #[test]
    fn test_users_are_independent() {
        let mut limiter = RateLimiter::default();
        let start = Instant::now();
        for _ in 0..5 {
            limiter.record_failure_at("dave", start);
        }
        assert!(limiter.locked_out_at("dave", start).is_some());
        assert!(limiter.locked_out_at("erin", start).is_none());
    }

    #[test]
    fn test_reset_clears_history() {
        let mut limiter = RateLimiter::default();
        let start = Instant::now();
        for _ in 0..4 {
            limiter.record_failure_at("fred", start);
        }
        limiter.reset("fred");
        assert!(limiter.record_failure_at("fred", start).is_none());
    }
}
