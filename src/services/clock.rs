use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

const MILLIS_PER_MINUTE: i64 = 60 * 1000;

/// Converts a configured minute count to milliseconds, saturating at
/// `i64::MAX` instead of wrapping.
pub fn minutes_to_millis(minutes: u64) -> i64 {
    i64::try_from(minutes)
        .ok()
        .and_then(|minutes| minutes.checked_mul(MILLIS_PER_MINUTE))
        .unwrap_or(i64::MAX)
}

/// Source of epoch milliseconds for the rate limiter and response cache.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn advance_millis(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.advance_millis(minutes * MILLIS_PER_MINUTE);
    }

    pub fn set_millis(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
