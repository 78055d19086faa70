//! Cache Store Module
//!
//! In-memory TTL map with lazy expiry on read and a sweep for proactive
//! reclamation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock, DEFAULT_TTL_MS};

// == Lookup ==
/// Result of a non-evicting lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Fresh(T),
    Stale(T),
    Missing,
}

// == API Cache ==
/// Response cache keyed by namespaced request keys.
#[derive(Debug)]
pub struct ApiCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// Read statistics
    stats: CacheStats,
    /// TTL in milliseconds for entries set without an explicit TTL
    default_ttl: u64,
    /// Time source
    clock: Arc<dyn Clock>,
}

impl<T: Clone> ApiCache<T> {
    // == Constructor ==
    /// Creates an empty cache using the wall clock.
    pub fn new(default_ttl: u64) -> Self {
        Self::with_clock(default_ttl, Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(default_ttl: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            default_ttl,
            clock,
        }
    }

    /// TTL applied when `set` is called without one.
    pub fn default_ttl(&self) -> u64 {
        self.default_ttl
    }

    // == Set ==
    /// Stores `data` under `key`, overwriting any previous entry and
    /// restarting its TTL.
    pub fn set(&mut self, key: impl Into<String>, data: T, ttl: Option<u64>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(data, self.clock.now_ms(), ttl);
        self.entries.insert(key.into(), entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a fresh value by key.
    ///
    /// A stale entry is removed and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if entry.is_valid(now) => {
                let data = entry.data.clone();
                self.stats.record_hit();
                Some(data)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_expirations(1);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                debug!(key, "api cache entry expired on read");
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Returns whether a fresh entry exists. Stale entries are removed the
    /// same way `get` removes them; hit/miss counters are left alone.
    pub fn has(&mut self, key: &str) -> bool {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if entry.is_valid(now) => true,
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_expirations(1);
                self.stats.set_total_entries(self.entries.len());
                false
            }
            None => false,
        }
    }

    // == Peek ==
    /// Looks up `key` without removing anything.
    ///
    /// Counts a hit for a fresh entry and a miss otherwise. A stale entry is
    /// kept so a failed refresh can still fall back to it.
    pub fn peek(&mut self, key: &str) -> Lookup<T> {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if entry.is_valid(now) => {
                self.stats.record_hit();
                Lookup::Fresh(entry.data.clone())
            }
            Some(entry) => {
                self.stats.record_miss();
                Lookup::Stale(entry.data.clone())
            }
            None => {
                self.stats.record_miss();
                Lookup::Missing
            }
        }
    }

    // == Get Stale ==
    /// Returns the stored value whether or not it is still fresh, without
    /// removing it. Used to mask upstream failures with old data.
    pub fn get_stale(&self, key: &str) -> Option<T> {
        self.entries.get(key).map(|entry| entry.data.clone())
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether an entry was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Invalidate Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        self.stats.set_total_entries(self.entries.len());

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(prefix, removed, "api cache namespace invalidated");
        }
        removed
    }

    // == Cleanup ==
    /// Removes all entries whose age exceeds their own ttl.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();

        self.entries.retain(|_, entry| entry.is_valid(now));

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Keys currently held, fresh or stale, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    // == Length ==
    /// Returns the number of entries held, including stale ones not yet
    /// reclaimed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Default for ApiCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_MS)
    }
}
