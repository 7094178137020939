//! Cached query executor: the TTL cache and the deduplicator composed
//! around an arbitrary async fetch.

use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use blogdash_core::cache::{deserialize_value, serialize_value};
use blogdash_core::storage::StoreError;

use super::dedup::RequestDeduplicator;
use super::ttl_cache::TtlCache;

type FetchResult = Result<Vec<u8>, StoreError>;

/// Query result cache shared by every access-layer call.
///
/// Results are stored as JSON bytes so one instance holds every result
/// shape. Construct one per application (or per test) and pass it around
/// behind an `Arc`.
#[derive(Default)]
pub struct QueryCache {
    cache: TtlCache<Vec<u8>>,
    in_flight: RequestDeduplicator<FetchResult>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached value for `key`, or runs `query_fn` to produce it.
    ///
    /// 1. A valid cache entry is returned without running anything.
    /// 2. A request already in flight for `key` is awaited instead of
    ///    starting another.
    /// 3. Otherwise `query_fn` runs. A success is cached for `ttl` before
    ///    the in-flight registration is dropped; a failure is not cached.
    pub async fn cached_query<V, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        query_fn: F,
    ) -> Result<V, StoreError>
    where
        V: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, StoreError>> + Send + 'static,
    {
        if let Some(bytes) = self.cache.get(key) {
            match deserialize_value(&bytes) {
                Ok(value) => {
                    tracing::trace!(key = %key, "Cache hit");
                    return Ok(value);
                }
                Err(err) => {
                    // Treat as a miss and refetch.
                    tracing::warn!(key = %key, error = %err, "Cached value deserialization failed");
                    self.cache.delete(key);
                }
            }
        }

        tracing::trace!(key = %key, "Cache miss");

        let cache = self.cache.clone();
        let owned_key = key.to_string();
        let request = self.in_flight.dedupe(key, move || {
            let fetch = query_fn();
            async move {
                let value = fetch.await?;
                let bytes = serialize_value(&value)?;
                cache.set(&owned_key, bytes.clone(), ttl);
                Ok::<_, StoreError>(bytes)
            }
        });

        let bytes = request.await?;
        Ok(deserialize_value(&bytes)?)
    }

    /// Drops the given keys. Entries containing `*` are treated as glob patterns.
    pub fn invalidate<S: AsRef<str>>(&self, patterns: &[S]) -> usize {
        patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                if pattern.contains('*') {
                    self.cache.delete_pattern(pattern)
                } else {
                    usize::from(self.cache.delete(pattern))
                }
            })
            .sum()
    }

    /// Returns true if `key` holds a valid entry.
    pub fn contains(&self, key: &str) -> bool {
        self.cache.get(key).is_some()
    }

    /// Returns true if a request for `key` is in flight.
    pub fn is_pending(&self, key: &str) -> bool {
        self.in_flight.is_pending(key)
    }

    /// Number of stored entries, expired ones included.
    pub fn size(&self) -> usize {
        self.cache.size()
    }

    /// Removes expired entries.
    pub fn cleanup(&self) -> usize {
        self.cache.cleanup()
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}
