//! # Quote Cache
//!
//! A small keyed cache with an explicit time-to-live, for services that front
//! slow or rate-limited quote providers. Each entry records when it was
//! inserted; freshness is checked on read and stale entries are evicted
//! explicitly with `purge_expired`.
//!
//! Every time-dependent method has an `_at` variant taking the current
//! `Instant`, so TTL behaviour can be tested without sleeping.

use serde::Deserialize;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// TTL settings for one cached upstream, e.g. `{ "ttl": "60s" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CachePolicy {
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Key -> (value, insertion time) map with a fixed TTL.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, Entry<V>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn with_policy(policy: CachePolicy) -> Self {
        Self::new(policy.ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(
            key,
            Entry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Returns the cached value if it is younger than the TTL.
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.value.clone())
    }

    /// Returns the fresh cached value, or calls `fetch` and caches its result.
    pub fn get_or_insert_with<F>(&mut self, key: K, fetch: F) -> V
    where
        F: FnOnce() -> V,
    {
        self.get_or_insert_with_at(key, Instant::now(), fetch)
    }

    pub fn get_or_insert_with_at<F>(&mut self, key: K, now: Instant, fetch: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get_at(&key, now) {
            return value;
        }
        let value = fetch();
        self.insert_at(key, value.clone(), now);
        value
    }

    /// Fallible variant: on error nothing is cached and the error is returned.
    pub fn try_get_or_insert_with_at<F, E>(
        &mut self,
        key: K,
        now: Instant,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get_at(&key, now) {
            return Ok(value);
        }
        let value = fetch()?;
        self.insert_at(key, value.clone(), now);
        Ok(value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Evicts every entry older than the TTL and returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < ttl);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "Expired cache entries purged");
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn is_fresh(&self, entry: &Entry<V>, now: Instant) -> bool {
        now.saturating_duration_since(entry.inserted_at) < self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    #[test]
    fn test_fresh_entry_is_returned() {
        let start = Instant::now();
        let mut cache = TtlCache::new(TTL);
        cache.insert_at("^GSPC", 5000.0, start);
        assert_eq!(cache.get_at(&"^GSPC", start + Duration::from_secs(59)), Some(5000.0));
    }

    #[test]
    fn test_entry_expires_at_ttl() {
        let start = Instant::now();
        let mut cache = TtlCache::new(TTL);
        cache.insert_at("^GSPC", 5000.0, start);
        assert_eq!(cache.get_at(&"^GSPC", start + TTL), None);
        // expiry does not evict on its own
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_refreshes_timestamp() {
        let start = Instant::now();
        let mut cache = TtlCache::new(TTL);
        cache.insert_at("btc", 1, start);
        cache.insert_at("btc", 2, start + Duration::from_secs(50));
        assert_eq!(cache.get_at(&"btc", start + Duration::from_secs(100)), Some(2));
    }

    #[test]
    fn test_get_or_insert_with_fetches_only_when_stale() {
        let start = Instant::now();
        let mut cache = TtlCache::new(TTL);
        let mut calls = 0;

        let v = cache.get_or_insert_with_at("fx", start, || {
            calls += 1;
            1.08
        });
        assert_eq!(v, 1.08);
        let v = cache.get_or_insert_with_at("fx", start + Duration::from_secs(10), || {
            calls += 1;
            9.99
        });
        assert_eq!(v, 1.08);
        let v = cache.get_or_insert_with_at("fx", start + Duration::from_secs(61), || {
            calls += 1;
            1.10
        });
        assert_eq!(v, 1.10);
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_failed_fetch_is_not_cached() {
        let start = Instant::now();
        let mut cache: TtlCache<&str, f64> = TtlCache::new(TTL);
        let result: Result<f64, &str> =
            cache.try_get_or_insert_with_at("eth", start, || Err("timeout"));
        assert_eq!(result, Err("timeout"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let start = Instant::now();
        let mut cache = TtlCache::new(TTL);
        cache.insert_at("a", 1, start);
        cache.insert_at("b", 2, start + Duration::from_secs(30));
        assert_eq!(cache.purge_expired_at(start + Duration::from_secs(70)), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_at(&"b", start + Duration::from_secs(70)), Some(2));
    }

    #[test]
    fn test_policy_from_humantime() {
        let policy: CachePolicy = serde_json::from_str(r#"{ "ttl": "1h" }"#).unwrap();
        assert_eq!(policy.ttl, Duration::from_secs(3600));
        let cache: TtlCache<String, u32> = TtlCache::with_policy(policy);
        assert_eq!(cache.ttl(), Duration::from_secs(3600));
    }
}
