//! Time-expiring cache
//!
//! A small key/value cache for idempotent fetches (e.g. comment lists).
//! Entries expire after a fixed TTL; expired entries are evicted lazily on
//! read. Keys are namespaced under a prefix so `clear()` removes exactly the
//! entries this cache owns.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use medibook_common::cache::{CacheConfig, TtlCache};
//!
//! let cache: TtlCache<Vec<String>> =
//!     TtlCache::new(CacheConfig::new(Duration::from_secs(300), "comments_cache_"));
//! cache.set("article-1", vec!["first!".to_string()]);
//! assert_eq!(cache.get("article-1"), Some(vec!["first!".to_string()]));
//! ```
//!
//! # Concurrency
//!
//! Last writer wins. The cache is not a source of truth; callers only store
//! values they can fetch again.

mod config;
mod core;
mod stats;

pub use config::CacheConfig;
pub use core::TtlCache;
pub use stats::CacheStats;
