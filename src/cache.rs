//! Generic keyed cache with per-entry expiry.
//!
//! Explicit injected state: the composition root constructs a cache and
//! hands it to whichever service needs one; nothing here is a global.
//!
//! Concurrency: one mutex guards the map, so writes are atomic per key and
//! no reader observes a half-written entry. The fetch runs outside the
//! lock; concurrent fetches for the same key may both invoke it (accepted,
//! bounded cost; no single-flight guarantee).

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A cached value and the instant it was stored.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Keyed cache whose entries expire after a caller-supplied TTL.
///
/// Entries are swept only when the map is full at insert time (capped TTL
/// sweep); if the sweep frees nothing, the oldest entry is dropped.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    capacity: usize,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache bounded to `capacity` distinct keys.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Return the cached value for `key` if present and younger than `ttl`;
    /// otherwise invoke `fetch`, store its result, and return it.
    ///
    /// # Errors
    /// Propagates the fetch error unchanged. A failed fetch never touches
    /// the map, so no stale or partial record poisons the cache.
    pub fn get_or_fetch<E>(
        &self,
        key: K,
        ttl: Duration,
        fetch: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        self.get_or_fetch_at(Instant::now(), key, ttl, fetch)
    }

    fn get_or_fetch_at<E>(
        &self,
        now: Instant,
        key: K,
        ttl: Duration,
        fetch: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.lookup(now, &key, ttl) {
            return Ok(value);
        }

        // Fetch outside the lock: slow external calls must not serialize
        // unrelated keys behind this one.
        let value = fetch()?;

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            sweep_expired(&mut entries, now, ttl);
            if entries.len() >= self.capacity {
                drop_oldest(&mut entries);
            }
        }
        entries.insert(
            key,
            CacheEntry {
                value: value.clone(),
                stored_at: now,
            },
        );
        Ok(value)
    }

    fn lookup(&self, now: Instant, key: &K, ttl: Duration) -> Option<V> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(key)?;
        if now.duration_since(entry.stored_at) < ttl {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Number of entries currently held, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sweep_expired<K: Eq + Hash, V>(
    entries: &mut HashMap<K, CacheEntry<V>>,
    now: Instant,
    ttl: Duration,
) {
    entries.retain(|_, entry| now.duration_since(entry.stored_at) < ttl);
}

fn drop_oldest<K: Eq + Hash + Clone, V>(entries: &mut HashMap<K, CacheEntry<V>>) {
    if let Some(oldest) = entries
        .iter()
        .min_by_key(|(_, entry)| entry.stored_at)
        .map(|(key, _)| key.clone())
    {
        entries.remove(&oldest);
    }
}
