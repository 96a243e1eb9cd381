//! Key/value cache with per-entry expiry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::observability::metrics;

/// Expiry used when `now + ttl` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(30 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// A thread-safe cache of JSON values. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct SimpleCache {
    inner: Arc<DashMap<String, CacheEntry>>,
}

impl SimpleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value if present and unexpired.
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        // The shard guard must be released before removing.
        let lookup = self
            .inner
            .get(key)
            .map(|entry| (!entry.is_expired(now)).then(|| entry.value.clone()));

        let hit = match lookup {
            Some(Some(value)) => Some(value),
            Some(None) => {
                self.inner.remove_if(key, |_, entry| entry.is_expired(now));
                metrics::record_cache_size(self.inner.len());
                None
            }
            None => None,
        };
        metrics::record_cache_lookup(hit.is_some());
        hit
    }

    /// Store `value` under `key` for `ttl`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        self.inner.insert(key.into(), CacheEntry { value, expires_at });
        metrics::record_cache_size(self.inner.len());
    }

    /// Typed lookup; a value that no longer deserializes counts as a miss.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|v| serde_json::from_value(v).ok())
    }

    /// Typed store.
    pub fn set_as<T: Serialize>(
        &self,
        key: impl Into<String>,
        value: &T,
        ttl: Duration,
    ) -> Result<(), serde_json::Error> {
        let value = serde_json::to_value(value)?;
        self.set(key, value, ttl);
        Ok(())
    }

    pub fn delete(&self, key: &str) -> bool {
        let removed = self.inner.remove(key).is_some();
        metrics::record_cache_size(self.inner.len());
        removed
    }

    /// Remove every key starting with `prefix`; returns how many were removed.
    pub fn delete_by_prefix(&self, prefix: &str) -> usize {
        let keys: Vec<String> = self
            .inner
            .iter()
            .filter(|entry| entry.key().starts_with(prefix))
            .map(|entry| entry.key().clone())
            .collect();

        let removed = keys
            .iter()
            .filter(|key| self.inner.remove(key.as_str()).is_some())
            .count();

        tracing::debug!(prefix = %prefix, removed, "Cache prefix invalidated");
        metrics::record_cache_size(self.inner.len());
        removed
    }

    /// Number of stored entries, expired-but-unread ones included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn clear(&self) {
        self.inner.clear();
        metrics::record_cache_size(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_set_then_get() {
        let cache = SimpleCache::new();
        cache.set("k", json!("v"), Duration::from_secs(1));
        assert_eq!(cache.get("k"), Some(json!("v")));
    }

    #[test]
    fn test_unrepresentable_ttl_does_not_panic() {
        let cache = SimpleCache::new();
        cache.set("forever", json!(1), Duration::from_secs(u64::MAX));
        cache.set("long", json!(2), Duration::from_secs(i64::MAX as u64));
        assert_eq!(cache.get("forever"), Some(json!(1)));
        assert_eq!(cache.get("long"), Some(json!(2)));
    }

    #[test]
    fn test_entry_expires() {
        let cache = SimpleCache::new();
        cache.set("k", json!(1), Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(40));

        // Still stored until a lookup touches it.
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_overwrite_resets_value_and_ttl() {
        let cache = SimpleCache::new();
        cache.set("k", json!(1), Duration::from_millis(10));
        cache.set("k", json!(2), Duration::from_secs(60));
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("k"), Some(json!(2)));
    }

    #[test]
    fn test_delete_by_prefix() {
        let cache = SimpleCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("user:1", json!(1), ttl);
        cache.set("user:2", json!(2), ttl);
        cache.set("order:1", json!(3), ttl);

        assert_eq!(cache.delete_by_prefix("user:"), 2);
        assert_eq!(cache.get("user:1"), None);
        assert_eq!(cache.get("user:2"), None);
        assert_eq!(cache.get("order:1"), Some(json!(3)));
    }

    #[test]
    fn test_delete_single_key() {
        let cache = SimpleCache::new();
        cache.set("a", json!(true), Duration::from_secs(60));
        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_typed_helpers() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Brand {
            name: String,
        }

        let cache = SimpleCache::new();
        let brand = Brand { name: "Acme".into() };
        cache.set_as("brand", &brand, Duration::from_secs(60)).unwrap();
        assert_eq!(cache.get_as::<Brand>("brand"), Some(brand));
        assert_eq!(cache.get_as::<u32>("brand"), None);
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = SimpleCache::new();
        let other = cache.clone();
        other.set("shared", json!(1), Duration::from_secs(60));
        assert_eq!(cache.get("shared"), Some(json!(1)));
        cache.clear();
        assert!(other.is_empty());
    }

    #[test]
    fn test_concurrent_writers() {
        let cache = SimpleCache::new();
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        cache.set(format!("t{t}:{i}"), json!(i), Duration::from_secs(60));
                        assert_eq!(cache.get(&format!("t{t}:{i}")), Some(json!(i)));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(cache.len(), 800);
        assert_eq!(cache.delete_by_prefix("t3:"), 100);
    }
}
