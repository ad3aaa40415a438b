//! Content-addressed result cache
//!
//! Fingerprint-keyed memo of finished reports. Injected into the analyzer
//! with an explicit capacity and TTL rather than living as process-global
//! state. Eviction is clear-everything-then-insert once capacity is
//! reached, a deliberate simplicity/memory trade-off over LRU; entries also
//! expire individually after the TTL.
//!
//! The whole check-capacity / clear / insert sequence runs under one lock
//! so concurrent requests cannot jointly exceed capacity. Nothing but map
//! operations happens under the lock.

use crate::models::Report;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

struct CacheEntry {
    report: Report,
    created: Instant,
}

/// Shared, mutable report memo. `Send + Sync`; one instance per analyzer.
pub struct ReportCache {
    capacity: usize,
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ReportCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Look up a fingerprint. Entries older than the TTL miss and are
    /// evicted on observation.
    pub fn get(&self, fingerprint: &str) -> Option<Report> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        match entries.get(fingerprint) {
            Some(entry) if entry.created.elapsed() < self.ttl => Some(entry.report.clone()),
            Some(_) => {
                entries.remove(fingerprint);
                None
            }
            None => None,
        }
    }

    /// Insert a report. Capacity check, possible full clear and the insert
    /// itself form one critical section.
    pub fn insert(&self, fingerprint: String, report: Report) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        if entries.len() >= self.capacity {
            debug!(capacity = self.capacity, "cache at capacity, clearing");
            entries.clear();
        }
        entries.insert(
            fingerprint,
            CacheEntry {
                report,
                created: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Explicit teardown for tests and shutdown paths.
    pub fn clear(&self) {
        self.entries.lock().expect("cache lock poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(score: u32) -> Report {
        Report::build(Vec::new(), score, 0, "abcd".to_string())
    }

    fn cache(capacity: usize, ttl_ms: u64) -> ReportCache {
        ReportCache::new(capacity, Duration::from_millis(ttl_ms))
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = cache(4, 5_000);
        cache.insert("aaaa".into(), report(90));
        let hit = cache.get("aaaa").expect("fresh entry hits");
        assert_eq!(hit.score, 90);
    }

    #[test]
    fn test_expired_entry_misses_and_is_evicted() {
        let cache = cache(4, 0);
        cache.insert("aaaa".into(), report(90));
        assert!(cache.get("aaaa").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_clear_then_insert() {
        let cache = cache(3, 5_000);
        for (i, fp) in ["aaaa", "bbbb", "cccc"].iter().enumerate() {
            cache.insert((*fp).into(), report(i as u32));
        }
        assert_eq!(cache.len(), 3);
        // The insert that finds the cache full clears everything first.
        cache.insert("dddd".into(), report(99));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("aaaa").is_none());
        assert_eq!(cache.get("dddd").expect("survivor").score, 99);
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let cache = cache(5, 5_000);
        for i in 0..23 {
            cache.insert(format!("{i:04x}"), report(i));
            assert!(cache.len() <= 5);
        }
    }
}
