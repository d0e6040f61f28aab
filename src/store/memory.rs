use crate::core::cache::Cache;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at < Instant::now())
    }
}

/// In-memory cache with one freshness window per instance.
///
/// Each read category gets its own cache, so the window is fixed at
/// construction instead of being decided per write. Concurrent misses on
/// the same key are deduplicated through [`get_or_fetch`](Self::get_or_fetch):
/// one caller fetches, the rest wait and read the landed value.
pub struct MemoryCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    in_flight: Mutex<HashMap<K, Arc<Mutex<()>>>>,
    ttl: Option<Duration>,
}

impl<K, V> MemoryCache<K, V> {
    /// A cache whose entries go stale after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    /// A cache whose entries stay fresh until removed.
    pub fn unbounded() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            ttl: None,
        }
    }
}

impl<K, V> MemoryCache<K, V>
where
    K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Returns the cached value for `key`, or runs `fetch` and caches its
    /// result. A fetch already in flight for the same key is awaited
    /// instead of duplicated; errors are returned to the caller and never
    /// cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let gate = {
            let mut in_flight = self.in_flight.lock().await;
            Arc::clone(in_flight.entry(key.clone()).or_default())
        };
        let _leader = gate.lock().await;

        // The fetch we queued behind may have landed this key already.
        if let Some(value) = self.get(&key).await {
            debug!(?key, "coalesced with an in-flight fetch");
            return Ok(value);
        }

        let result = fetch().await;
        if let Ok(value) = &result {
            self.put(key.clone(), value.clone()).await;
        }
        self.in_flight.lock().await.remove(&key);
        result
    }
}

#[async_trait]
impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                debug!(?key, "cache entry went stale");
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    async fn put(&self, key: K, value: V) {
        let entry = Entry {
            value,
            expires_at: self.ttl.map(|ttl| Instant::now() + ttl),
        };
        self.entries.lock().await.insert(key, entry);
    }

    async fn remove(&self, key: &K) {
        self.entries.lock().await.remove(key);
        debug!(?key, "cache entry invalidated");
    }

    async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
