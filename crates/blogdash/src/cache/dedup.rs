//! In-flight request deduplication.
//!
//! The first caller for a key runs its producer; callers arriving before
//! the result settles await the same shared future. The registration is
//! dropped when the future completes, successfully or not, so the next
//! call starts fresh.
//!
//! The map only holds a weak handle. A request that every caller has
//! dropped is dropped with them, releasing its key even if it was never
//! polled.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::{BoxFuture, FutureExt, Shared, WeakShared};

type PendingMap<T> = Arc<Mutex<HashMap<String, Pending<T>>>>;

struct Pending<T> {
    /// Tells a registration apart from a later one under the same key.
    id: u64,
    request: WeakShared<BoxFuture<'static, T>>,
}

/// Shares one outstanding future per key among concurrent callers.
pub struct RequestDeduplicator<T: Clone> {
    pending: PendingMap<T>,
    next_id: AtomicU64,
}

impl<T: Clone> Default for RequestDeduplicator<T> {
    fn default() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<T> RequestDeduplicator<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the outstanding future for `key`, or starts one with `producer`.
    ///
    /// `producer` is only called when nothing is pending for the key. The
    /// request stays registered while at least one returned handle is alive.
    pub fn dedupe<F, Fut>(&self, key: &str, producer: F) -> Shared<BoxFuture<'static, T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let mut pending = self.pending.lock().expect("Lock poisoned");

        if let Some(existing) = pending.get(key).and_then(|p| p.request.upgrade()) {
            tracing::trace!(key = %key, "Joining in-flight request");
            return existing;
        }

        let request = producer();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let guard = PendingGuard {
            key: key.to_string(),
            id,
            pending: Arc::clone(&self.pending),
        };
        let shared = async move {
            let output = request.await;
            drop(guard);
            output
        }
        .boxed()
        .shared();

        if let Some(request) = shared.downgrade() {
            pending.insert(key.to_string(), Pending { id, request });
        }
        shared
    }

    /// Returns true while a request for `key` is outstanding.
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending
            .lock()
            .expect("Lock poisoned")
            .contains_key(key)
    }

    /// Number of outstanding requests.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().expect("Lock poisoned").len()
    }
}

/// Unregisters a key when the request it belongs to settles or is dropped.
struct PendingGuard<T> {
    key: String,
    id: u64,
    pending: PendingMap<T>,
}

impl<T> Drop for PendingGuard<T> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if pending.get(&self.key).is_some_and(|p| p.id == self.id) {
                pending.remove(&self.key);
            }
        }
    }
}
