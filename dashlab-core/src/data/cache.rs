//! In-process memoization for expensive loads.
//!
//! `Cache<K, V>` is the capability the loaders depend on; `MemoryCache` is the
//! process-lifetime implementation. Values are stored behind `Arc` so readers
//! never clone a table and entries are never mutated in place.
//!
//! Concurrent callers computing the same missing key may both run the
//! computation; the last writer wins. Results for a key are deterministic
//! within the memoization window, so either value is acceptable.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Keyed memoization capability.
pub trait Cache<K, V>: Send + Sync {
    /// Look up a live entry.
    fn get(&self, key: &K) -> Option<Arc<V>>;

    /// Store a value, replacing any existing entry.
    fn insert(&self, key: K, value: Arc<V>);

    /// Number of live entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    fn clear(&self);

    /// Return the cached value for `key`, or compute, store, and return it.
    ///
    /// Errors from `compute` are returned as-is and never cached.
    fn get_or_compute<E, F>(&self, key: K, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
        Self: Sized,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let value = Arc::new(compute()?);
        self.insert(key, Arc::clone(&value));
        Ok(value)
    }
}

#[derive(Debug)]
struct Entry<V> {
    value: Arc<V>,
    inserted_at: Instant,
}

/// RwLock-guarded hash map with an optional time-to-live.
#[derive(Debug)]
pub struct MemoryCache<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    ttl: Option<Duration>,
}

impl<K, V> MemoryCache<K, V> {
    /// Entries live until the process exits or `clear` is called.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: None,
        }
    }

    /// Entries expire `ttl` after insertion.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn is_live(&self, entry: &Entry<V>) -> bool {
        match self.ttl {
            Some(ttl) => entry.inserted_at.elapsed() < ttl,
            None => true,
        }
    }
}

impl<K, V> Default for MemoryCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Send + Sync,
{
    fn get(&self, key: &K) -> Option<Arc<V>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(key)
            .filter(|entry| self.is_live(entry))
            .map(|entry| Arc::clone(&entry.value))
    }

    fn insert(&self, key: K, value: Arc<V>) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if self.ttl.is_some() {
            entries.retain(|_, entry| self.is_live(entry));
        }
        entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|entry| self.is_live(entry)).count()
    }

    fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
