//! TTL cache implementation

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use super::config::CacheConfig;
use super::stats::{CacheStats, MetricsCollector};
use crate::time::{Clock, SystemClock};

/// Entry stored in the cache
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    stored_at: Instant,
}

/// Thread-safe cache whose entries expire after a fixed TTL
///
/// # Type Parameters
/// - `V`: Value type (must be `Clone`)
/// - `C`: Clock type for time-based operations (defaults to `SystemClock`)
pub struct TtlCache<V, C = SystemClock>
where
    V: Clone,
    C: Clock,
{
    entries: Arc<RwLock<HashMap<String, CacheEntry<V>>>>,
    config: CacheConfig,
    metrics: MetricsCollector,
    clock: C,
}

impl<V: Clone> TtlCache<V, SystemClock> {
    /// Create a new cache with the given configuration using system clock
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<V, C> TtlCache<V, C>
where
    V: Clone,
    C: Clock + Clone,
{
    /// Create a new cache with a custom clock (useful for testing)
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            config,
            metrics: MetricsCollector::default(),
            clock,
        }
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix, key)
    }

    /// Return the cached value if it is younger than the TTL
    ///
    /// An expired entry is removed before `None` is returned.
    pub fn get(&self, key: &str) -> Option<V> {
        let storage_key = self.storage_key(key);
        let now = self.clock.now();
        let mut entries = self.entries.write();

        let Some(entry) = entries.get(&storage_key) else {
            if self.config.track_metrics {
                self.metrics.record_miss();
            }
            return None;
        };

        if now.duration_since(entry.stored_at) >= self.config.ttl {
            entries.remove(&storage_key);
            if self.config.track_metrics {
                self.metrics.record_miss();
                self.metrics.record_expiration();
            }
            return None;
        }

        if self.config.track_metrics {
            self.metrics.record_hit();
        }
        Some(entry.data.clone())
    }

    /// Store a value stamped with the current time, replacing any previous one
    ///
    /// Expired entries under this prefix are dropped on the same write, so
    /// keys that are never read again do not accumulate.
    pub fn set(&self, key: &str, data: V) {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        self.purge_locked(&mut entries, now);
        entries.insert(self.storage_key(key), CacheEntry { data, stored_at: now });
    }

    /// Drop every expired entry under this cache's key prefix
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write();
        self.purge_locked(&mut entries, now)
    }

    fn purge_locked(&self, entries: &mut HashMap<String, CacheEntry<V>>, now: Instant) -> usize {
        let prefix = self.config.key_prefix.as_str();
        let ttl = self.config.ttl;
        let before = entries.len();
        entries.retain(|key, entry| {
            !key.starts_with(prefix) || now.duration_since(entry.stored_at) < ttl
        });

        let purged = before - entries.len();
        if self.config.track_metrics {
            for _ in 0..purged {
                self.metrics.record_expiration();
            }
        }
        purged
    }

    /// Remove one entry
    pub fn remove(&self, key: &str) -> Option<V> {
        self.entries.write().remove(&self.storage_key(key)).map(|entry| entry.data)
    }

    /// Remove every entry under this cache's key prefix
    ///
    /// Returns the number of entries removed.
    pub fn clear(&self) -> usize {
        let prefix = &self.config.key_prefix;
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix.as_str()));
        before - entries.len()
    }

    /// Current number of entries (including expired ones not yet read)
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counter snapshot; counters stay at zero unless metrics are enabled
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len())
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl<V, C> Clone for TtlCache<V, C>
where
    V: Clone,
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            config: self.config.clone(),
            metrics: self.metrics.clone(),
            clock: self.clock.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for cache::core.
    use std::time::Duration;

    use super::*;
    use crate::time::MockClock;

    const TTL: Duration = Duration::from_secs(300);

    fn cache_with_clock() -> (TtlCache<String, MockClock>, MockClock) {
        let clock = MockClock::new();
        let config = CacheConfig::new(TTL, "comments_cache_").with_metrics();
        let cache = TtlCache::with_clock(config, clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_set_then_get_returns_value() {
        let (cache, _clock) = cache_with_clock();

        cache.set("a1", "hello".to_string());

        assert_eq!(cache.get("a1"), Some("hello".to_string()));
        assert_eq!(cache.get("a2"), None);
    }

    #[test]
    fn test_entry_expires_after_ttl_and_is_evicted() {
        let (cache, clock) = cache_with_clock();
        cache.set("a1", "hello".to_string());

        clock.advance(TTL - Duration::from_secs(1));
        assert_eq!(cache.get("a1"), Some("hello".to_string()));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("a1"), None);
        assert!(cache.is_empty());

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expirations, 1);
    }

    #[test]
    fn test_set_refreshes_timestamp() {
        let (cache, clock) = cache_with_clock();
        cache.set("a1", "old".to_string());

        clock.advance(Duration::from_secs(200));
        cache.set("a1", "new".to_string());
        clock.advance(Duration::from_secs(200));

        assert_eq!(cache.get("a1"), Some("new".to_string()));
    }

    #[test]
    fn test_clear_removes_every_key() {
        let (cache, _clock) = cache_with_clock();
        cache.set("a1", "x".to_string());
        cache.set("a2", "y".to_string());

        assert_eq!(cache.clear(), 2);
        assert_eq!(cache.get("a1"), None);
        assert_eq!(cache.get("a2"), None);
    }

    #[test]
    fn test_clear_only_touches_own_prefix() {
        let clock = MockClock::new();
        let comments: TtlCache<String, MockClock> =
            TtlCache::with_clock(CacheConfig::new(TTL, "comments_cache_"), clock.clone());
        let mut other_config = comments.config().clone();
        other_config.key_prefix = "clinics_cache_".to_string();
        // Shares storage with `comments` but namespaces keys differently
        let clinics = TtlCache {
            entries: Arc::clone(&comments.entries),
            config: other_config,
            metrics: MetricsCollector::default(),
            clock,
        };

        comments.set("1", "comment".to_string());
        clinics.set("1", "clinic".to_string());

        assert_eq!(comments.clear(), 1);
        assert_eq!(clinics.get("1"), Some("clinic".to_string()));
    }

    #[test]
    fn test_set_drops_expired_entries_never_read_again() {
        let (cache, clock) = cache_with_clock();
        for article in ["a1", "a2", "a3"] {
            cache.set(article, "old".to_string());
        }

        clock.advance(TTL);
        cache.set("a4", "fresh".to_string());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a4"), Some("fresh".to_string()));
        assert_eq!(cache.stats().expirations, 3);
    }

    #[test]
    fn test_purge_expired_keeps_live_entries() {
        let (cache, clock) = cache_with_clock();
        cache.set("a1", "old".to_string());
        clock.advance(Duration::from_secs(200));
        cache.set("a2", "new".to_string());

        clock.advance(Duration::from_secs(100));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.get("a1"), None);
        assert_eq!(cache.get("a2"), Some("new".to_string()));
    }

    #[test]
    fn test_remove_single_entry() {
        let (cache, _clock) = cache_with_clock();
        cache.set("a1", "x".to_string());

        assert_eq!(cache.remove("a1"), Some("x".to_string()));
        assert_eq!(cache.get("a1"), None);
    }

    #[test]
    fn test_clones_share_entries() {
        let (cache, _clock) = cache_with_clock();
        let clone = cache.clone();

        clone.set("a1", "shared".to_string());

        assert_eq!(cache.get("a1"), Some("shared".to_string()));
    }
}
