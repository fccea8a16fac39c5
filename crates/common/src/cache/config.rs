//! Cache configuration

use std::time::Duration;

/// Default entry lifetime
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Configuration for [`TtlCache`](super::TtlCache)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live for entries
    pub ttl: Duration,

    /// Prefix prepended to every key; `clear()` removes only these keys
    pub key_prefix: String,

    /// Whether to collect hit/miss/expiration counters
    pub track_metrics: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl: DEFAULT_TTL, key_prefix: String::new(), track_metrics: false }
    }
}

impl CacheConfig {
    pub fn new(ttl: Duration, key_prefix: impl Into<String>) -> Self {
        Self { ttl, key_prefix: key_prefix.into(), track_metrics: false }
    }

    /// Enable hit/miss counters
    pub fn with_metrics(mut self) -> Self {
        self.track_metrics = true;
        self
    }
}
