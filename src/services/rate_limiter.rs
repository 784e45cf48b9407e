//! Sliding-window limiter for generation requests.
//!
//! The window moves continuously: a slot frees up exactly `window` after the
//! request that took it, not at a fixed bucket boundary.

use crate::services::clock::{minutes_to_millis, Clock};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const DEFAULT_MAX_REQUESTS: usize = 8;
pub const DEFAULT_WINDOW_MINUTES: u64 = 10;

const MILLIS_PER_MINUTE: i64 = 60 * 1000;

#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    pub max_requests: usize,
    pub window_minutes: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_MAX_REQUESTS,
            window_minutes: DEFAULT_WINDOW_MINUTES,
        }
    }
}

pub struct RateLimiter {
    max_requests: usize,
    window_millis: i64,
    // Admission timestamps, oldest first.
    requests: Mutex<VecDeque<i64>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// A zero limit or zero-length window is raised to one.
    pub fn new(config: RateLimiterConfig, clock: Arc<dyn Clock>) -> Self {
        let max_requests = config.max_requests.max(1);
        Self {
            max_requests,
            window_millis: minutes_to_millis(config.window_minutes.max(1)),
            requests: Mutex::new(VecDeque::new()),
            clock,
        }
    }

    /// Admits and records a request if the window has room. Rejected attempts
    /// are not recorded.
    pub fn can_make_request(&self) -> bool {
        let now = self.clock.now_millis();
        let mut requests = self.lock();

        while let Some(&oldest) = requests.front() {
            if now.saturating_sub(oldest) >= self.window_millis {
                requests.pop_front();
            } else {
                break;
            }
        }

        if requests.len() >= self.max_requests {
            return false;
        }

        requests.push_back(now);
        true
    }

    pub fn time_until_reset_millis(&self) -> u64 {
        let now = self.clock.now_millis();
        let requests = self.lock();

        match requests.front() {
            None => 0,
            Some(&oldest) => (self.window_millis - now.saturating_sub(oldest)).max(0) as u64,
        }
    }

    /// Whole minutes until a slot frees up, rounded up.
    pub fn reset_eta_minutes(&self) -> u64 {
        self.time_until_reset_millis().div_ceil(MILLIS_PER_MINUTE as u64)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<i64>> {
        // A panic while holding the lock cannot leave the deque half-updated.
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
