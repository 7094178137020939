//! In-memory key-value cache with per-entry time-to-live.
//!
//! Expiration is lazy: an expired entry is dropped by the next `get` that
//! touches it, or in bulk by `cleanup`. There is no capacity limit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use blogdash_core::cache::pattern_matches;

/// A cached value with the moment it was stored and how long it stays valid.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    data: V,
    timestamp: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// Valid while `now - timestamp <= ttl`.
    fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.timestamp) > self.ttl
    }
}

/// Thread-safe TTL cache.
///
/// Cloning is cheap and clones share the same entries.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Arc<Mutex<HashMap<String, CacheEntry<V>>>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TtlCache<V> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Stores a value, replacing any existing entry for the key.
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        let entry = CacheEntry {
            data: value,
            timestamp: Instant::now(),
            ttl,
        };
        self.entries
            .lock()
            .expect("Lock poisoned")
            .insert(key.to_string(), entry);
    }

    /// Removes one key. Returns true if an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        self.entries
            .lock()
            .expect("Lock poisoned")
            .remove(key)
            .is_some()
    }

    /// Removes every key matching a glob pattern. Returns how many were removed.
    pub fn delete_pattern(&self, pattern: &str) -> usize {
        let mut entries = self.entries.lock().expect("Lock poisoned");
        let before = entries.len();
        entries.retain(|key, _| !pattern_matches(pattern, key));
        before - entries.len()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.lock().expect("Lock poisoned").clear();
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn size(&self) -> usize {
        self.entries.lock().expect("Lock poisoned").len()
    }

    /// Removes every expired entry. Returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock().expect("Lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::trace!(removed, remaining = entries.len(), "Cache cleanup");
        }
        removed
    }
}

impl<V: Clone> TtlCache<V> {
    /// Returns the value for a key if present and still valid.
    ///
    /// An expired entry is removed as a side effect.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().expect("Lock poisoned");
        let entry = entries.get(key)?;
        if !entry.is_expired(Instant::now()) {
            return Some(entry.data.clone());
        }
        entries.remove(key);
        None
    }
}
