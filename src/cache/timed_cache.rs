//! Time-based cache with TTL (Time To Live) support.
//!
//! Entries are checked against the TTL when they are read. An expired entry is
//! removed by the read that observes it; nothing sweeps the map in the background.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A cache entry with a timestamp.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// A thread-safe cache with time-based expiration.
///
/// An entry is readable while `now - inserted_at <= ttl`. The cache has no size
/// bound. It can be cloned cheaply; clones share the same storage.
///
/// # Memory Efficiency with Arc
///
/// For large values, consider wrapping them in `Arc` to avoid cloning on every hit:
/// ```ignore
/// let cache = TimedCache::<String, Arc<serde_json::Value>>::new(60);
/// cache.insert("key".to_string(), Arc::new(payload));
/// let value: Option<Arc<serde_json::Value>> = cache.get(&"key".to_string());
/// ```
#[derive(Clone)]
pub struct TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    cache: Arc<Mutex<HashMap<K, CacheEntry<V>>>>,
    ttl: Duration,
}

impl<K, V> TimedCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a new TimedCache with the specified TTL in seconds.
    pub fn new(ttl_seconds: u64) -> Self {
        Self::with_ttl(Duration::from_secs(ttl_seconds))
    }

    /// Create a new TimedCache with an arbitrary TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Insert a value into the cache, stamped with the current time.
    ///
    /// If a value with the same key already exists, it is replaced wholesale.
    pub fn insert(&self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Insert a value with an explicit insertion time.
    pub fn insert_at(&self, key: K, value: V, inserted_at: Instant) {
        let entry = CacheEntry { value, inserted_at };

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, entry);
        }
    }

    /// Get a value from the cache if it exists and hasn't expired.
    ///
    /// An expired entry is deleted before returning `None`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Get a value as if the current time were `now`.
    pub fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let mut cache = self.cache.lock().ok()?;

        let entry = cache.get(key)?;
        if now.saturating_duration_since(entry.inserted_at) <= self.ttl {
            return Some(entry.value.clone());
        }

        cache.remove(key);
        None
    }

    /// Get the number of entries in the cache (including expired ones not yet read).
    pub fn len(&self) -> usize {
        if let Ok(cache) = self.cache.lock() {
            cache.len()
        } else {
            0
        }
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> std::fmt::Debug for TimedCache<K, V>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
    V: Clone + std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.len())
            .finish()
    }
}
