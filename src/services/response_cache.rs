use crate::services::clock::{minutes_to_millis, Clock};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const DEFAULT_TTL_MINUTES: u64 = 30;

struct CacheEntry<V> {
    value: V,
    stored_at_millis: i64,
}

/// In-memory TTL cache. Entries expire lazily on read; there is no size bound
/// and no background sweep.
pub struct ResponseCache<V> {
    ttl_millis: i64,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new(ttl_minutes: u64, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl_millis(minutes_to_millis(ttl_minutes), clock)
    }

    pub fn with_ttl_millis(ttl_millis: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl_millis,
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now_millis();
        let mut entries = self.lock();

        let expired = match entries.get(key) {
            None => return None,
            Some(entry) => now.saturating_sub(entry.stored_at_millis) > self.ttl_millis,
        };

        if expired {
            entries.remove(key);
            return None;
        }

        entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn set(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry {
            value,
            stored_at_millis: self.clock.now_millis(),
        };
        self.lock().insert(key.into(), entry);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, stale ones included until they are read.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::ManualClock;

    const T0: i64 = 1_700_000_000_000;
    const TTL_MILLIS: i64 = 30 * 60 * 1000;

    fn cache() -> (ResponseCache<String>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(T0));
        (ResponseCache::new(DEFAULT_TTL_MINUTES, clock.clone()), clock)
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let (cache, clock) = cache();
        cache.set("raigad", "itinerary".to_string());

        clock.set_millis(T0 + TTL_MILLIS - 1);
        assert_eq!(cache.get("raigad"), Some("itinerary".to_string()));

        clock.set_millis(T0 + TTL_MILLIS + 1);
        assert_eq!(cache.get("raigad"), None);
    }

    #[test]
    fn test_stale_entry_is_evicted_on_read() {
        let (cache, clock) = cache();
        cache.set("torna", "old".to_string());
        assert_eq!(cache.len(), 1);

        clock.advance_minutes(31);
        assert_eq!(cache.get("torna"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_set_overwrites_and_refreshes_timestamp() {
        let (cache, clock) = cache();
        cache.set("lohagad", "first".to_string());

        clock.advance_minutes(20);
        cache.set("lohagad", "second".to_string());

        clock.advance_minutes(20);
        assert_eq!(cache.get("lohagad"), Some("second".to_string()));
    }

    #[test]
    fn test_clear_drops_everything() {
        let (cache, _clock) = cache();
        cache.set("a", "1".to_string());
        cache.set("b", "2".to_string());

        cache.clear();
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_key() {
        let (cache, _clock) = cache();
        assert_eq!(cache.get("sinhagad"), None);
    }

    #[test]
    fn test_huge_ttl_does_not_wrap() {
        let clock = Arc::new(ManualClock::new(T0));
        let cache = ResponseCache::new(u64::MAX, clock.clone());
        cache.set("rajgad", "kept".to_string());

        clock.advance_minutes(60 * 24 * 365);
        assert_eq!(cache.get("rajgad"), Some("kept".to_string()));
    }
}
