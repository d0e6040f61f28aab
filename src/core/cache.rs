//! Freshness-bounded cache abstraction used by the client state layer.

use async_trait::async_trait;

/// A read cache. Freshness policy belongs to the implementation; callers
/// only see values that are still within their window.
#[async_trait]
pub trait Cache<K, V>: Send + Sync {
    /// Returns the cached value unless it is absent or stale.
    async fn get(&self, key: &K) -> Option<V>;

    async fn put(&self, key: K, value: V);

    async fn remove(&self, key: &K);

    async fn clear(&self);
}
