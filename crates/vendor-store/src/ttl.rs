//! Time-to-live cache for computed views.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Cache entry with timestamp for TTL-based invalidation.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    fn is_stale(&self, ttl: Duration) -> bool {
        let age = Utc::now().signed_duration_since(self.cached_at);
        age > TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX)
    }
}

/// A value read from a [`TtlCache`] along with when it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    /// The cached value.
    pub data: T,
    /// When the value was stored.
    pub cached_at: DateTime<Utc>,
}

/// Keyed cache whose entries expire after a fixed time to live.
///
/// Stale entries are treated as misses and dropped on the next write.
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    /// Create an empty cache.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the time to live of entries.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the fresh value stored under `key`, if any.
    pub async fn get(&self, key: &str) -> Option<Cached<T>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if !entry.is_stale(self.ttl) => {
                debug!(key, "Cache hit");
                Some(Cached {
                    data: entry.data.clone(),
                    cached_at: entry.cached_at,
                })
            }
            Some(_) => {
                debug!(key, "Cache entry expired");
                None
            }
            None => {
                debug!(key, "Cache miss");
                None
            }
        }
    }

    /// Stores a value under `key` and returns its timestamp.
    pub async fn set(&self, key: impl Into<String>, data: T) -> DateTime<Utc> {
        let entry = CacheEntry::new(data);
        let cached_at = entry.cached_at;
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| !e.is_stale(self.ttl));
        entries.insert(key.into(), entry);
        cached_at
    }

    /// Removes the value stored under `key`. Returns true if one was present.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
