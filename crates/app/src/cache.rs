//! Read-through query cache
//!
//! Server reads are cached per [`QueryKey`] for a caller-chosen time to live.
//! Push events mark whole families of keys stale (see [`crate::events`]); the
//! next read of a stale key refetches.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    future::Future,
    sync::Arc,
};

use jiff::{SignedDuration, Timestamp};
use rustc_hash::FxHashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Identifies one server read: an operation name such as `orders.list` and
/// its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    operation: String,
    params: Vec<(String, String)>,
}

impl QueryKey {
    /// Key for `operation` without parameters.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            params: Vec::new(),
        }
    }

    /// Add a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }

    /// Operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Whether the operation is `prefix` or lives under it (`orders` covers
    /// `orders.list` but not `ordersummary`).
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.operation
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    fetched_at: Timestamp,
    stale_after: Timestamp,
}

impl<V> Entry<V> {
    fn is_fresh(&self, now: Timestamp) -> bool {
        now < self.stale_after
    }
}

/// Shared cache of server reads. Clones share the same entries.
pub struct QueryCache<V> {
    entries: Arc<Mutex<FxHashMap<QueryKey, Entry<V>>>>,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }
}

impl<V> Debug for QueryCache<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("QueryCache").finish_non_exhaustive()
    }
}

impl<V: Clone> QueryCache<V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached value for `key`, if it is still fresh.
    pub async fn get(&self, key: &QueryKey) -> Option<V> {
        let now = Timestamp::now();

        self.entries
            .lock()
            .await
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, fresh for `ttl`.
    pub async fn insert(&self, key: QueryKey, value: V, ttl: SignedDuration) {
        let fetched_at = Timestamp::now();
        let entry = Entry {
            value,
            fetched_at,
            stale_after: expiry(fetched_at, ttl),
        };

        self.entries.lock().await.insert(key, entry);
    }

    /// Serve `key` from the cache while fresh; otherwise await `fetch`, cache
    /// its value for `ttl` and return it.
    ///
    /// # Errors
    ///
    /// Returns the fetch error. Failed fetches leave the cache untouched.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: QueryKey,
        ttl: SignedDuration,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        debug!(operation = key.operation(), "cache miss");

        // The lock is not held across the fetch, so concurrent misses may
        // fetch twice; the later write wins.
        let value = fetch().await?;

        self.insert(key, value.clone(), ttl).await;

        Ok(value)
    }

    /// Mark every entry whose operation falls under `prefix` stale. Returns
    /// how many entries were affected.
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        let now = Timestamp::now();
        let mut entries = self.entries.lock().await;
        let mut affected = 0;

        for (key, entry) in entries.iter_mut() {
            if key.has_prefix(prefix) && entry.is_fresh(now) {
                entry.stale_after = now;
                affected += 1;
            }
        }

        debug!(prefix, affected, "invalidated queries");

        affected
    }

    /// When `key` was last fetched.
    pub async fn fetched_at(&self, key: &QueryKey) -> Option<Timestamp> {
        self.entries
            .lock()
            .await
            .get(key)
            .map(|entry| entry.fetched_at)
    }

    /// Number of cached entries, fresh or stale.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

fn expiry(fetched_at: Timestamp, ttl: SignedDuration) -> Timestamp {
    fetched_at.checked_add(ttl).unwrap_or(Timestamp::MAX)
}
