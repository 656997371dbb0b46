use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use avocet_core::AvocetError;
use lru::LruCache;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};

/// Result of a cache probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    /// Present and younger than the TTL.
    Fresh(V),
    /// Present but expired; usable only as a degraded fallback.
    Stale(V),
    /// Not present.
    Missing,
}

impl<V> Lookup<V> {
    /// The value regardless of freshness, if any.
    pub fn into_value(self) -> Option<V> {
        match self {
            Self::Fresh(v) | Self::Stale(v) => Some(v),
            Self::Missing => None,
        }
    }
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

/// Keyed TTL cache with stale-fallback semantics.
///
/// An entry is fresh while `now - inserted_at < ttl`. Expired entries are
/// retained (up to LRU capacity) so [`TtlCache::get_or_fetch`] can fall
/// back to them when a refetch fails; this is the only situation in which
/// a stale value is returned.
///
/// The store performs no I/O of its own; the only external effect is the
/// fetch closure the caller injects. Fetch failures are never retried
/// here, and retry policy belongs to the caller.
pub struct TtlCache<K, V> {
    inner: Mutex<LruCache<K, Entry<V>>>,
    // Per-key guards giving best-effort suppression of duplicate
    // concurrent fetches. Two first-ever requests for the same key can
    // still race to insert the guard; that narrow window is accepted.
    inflight: Mutex<HashMap<K, Arc<Mutex<()>>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<K, V> TtlCache<K, V>
where
    K: Clone + std::hash::Hash + Eq + Send + Sync,
    V: Clone + Send,
{
    /// Create a store with the given capacity and TTL, on the system clock.
    #[must_use]
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, Arc::new(SystemClock))
    }

    /// Create a store with an injected clock (tests). A zero capacity is
    /// bumped to one.
    #[must_use]
    pub fn with_clock(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(cap)),
            inflight: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Probe the cache without fetching.
    pub async fn get(&self, key: &K) -> Lookup<V> {
        let now = self.clock.now();
        let mut guard = self.inner.lock().await;
        match guard.get_mut(key) {
            Some(entry) if now.duration_since(entry.inserted_at) < self.ttl => {
                Lookup::Fresh(entry.value.clone())
            }
            Some(entry) => Lookup::Stale(entry.value.clone()),
            None => Lookup::Missing,
        }
    }

    /// Insert or overwrite, stamped with the clock's now.
    pub async fn put(&self, key: K, value: V) {
        let inserted_at = self.clock.now();
        let mut guard = self.inner.lock().await;
        guard.put(key, Entry { value, inserted_at });
    }

    /// Remove all entries. Used when a bulk refresh supersedes cached data.
    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    /// Number of entries currently held, fresh or stale.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// `true` when the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Return a fresh cached value, or fetch, store, and return.
    ///
    /// - Fresh hit: returns without invoking `fetch`.
    /// - Miss or stale: invokes `fetch`; on success the value is stored
    ///   and returned.
    /// - Fetch failure: returns the stale value when one exists,
    ///   otherwise propagates the failure.
    ///
    /// Concurrent callers for the same key serialize on a per-key guard,
    /// so the second caller observes the first caller's freshly stored
    /// value instead of fetching again. The store write happens only
    /// after the fetch future completes; if this call is cancelled
    /// mid-fetch the cache is left untouched.
    ///
    /// # Errors
    /// Propagates the fetch error when no stale entry can serve as
    /// fallback.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Result<V, AvocetError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, AvocetError>>,
    {
        if let Lookup::Fresh(v) = self.get(&key).await {
            return Ok(v);
        }

        let gate = {
            let mut inflight = self.inflight.lock().await;
            Arc::clone(inflight.entry(key.clone()).or_default())
        };
        let _held = gate.lock().await;

        // Re-check under the gate: a concurrent caller may have refilled.
        let stale = match self.get(&key).await {
            Lookup::Fresh(v) => {
                self.release_gate(&key, &gate).await;
                return Ok(v);
            }
            Lookup::Stale(v) => Some(v),
            Lookup::Missing => None,
        };

        let fetched = fetch().await;
        let result = match fetched {
            Ok(value) => {
                self.put(key.clone(), value.clone()).await;
                Ok(value)
            }
            Err(err) => {
                if let Some(v) = stale {
                    warn!(error = %err, "fetch failed, serving stale cache entry");
                    Ok(v)
                } else {
                    debug!(error = %err, "fetch failed with no stale fallback");
                    Err(err)
                }
            }
        };

        self.release_gate(&key, &gate).await;
        result
    }

    // Drop the per-key gate once no other caller holds it, keeping the
    // inflight map bounded by concurrency rather than key cardinality.
    async fn release_gate(&self, key: &K, gate: &Arc<Mutex<()>>) {
        let mut inflight = self.inflight.lock().await;
        // Map + our clone: anyone else still queued holds a third.
        if Arc::strong_count(gate) <= 2 {
            inflight.remove(key);
        }
    }
}
