//! Read caches over the profile store and the conversion ledger.
//!
//! Reads are served from memory within the freshness window; any successful
//! mutation invalidates the owner's cached entry so the next read reflects
//! it immediately.

use crate::core::accounts::{ConversionLedger, ProfileStore};
use crate::core::asset::{ConversionRecord, UserProfile};
use crate::core::cache::Cache;
use crate::core::config::CacheConfig;
use crate::core::error::StoreError;
use crate::store::memory::MemoryCache;
use async_trait::async_trait;
use std::time::Duration;

pub struct CachingProfiles<T: ProfileStore> {
    inner: T,
    profiles: MemoryCache<String, Option<UserProfile>>,
}

impl<T: ProfileStore> CachingProfiles<T> {
    pub fn new(inner: T, config: &CacheConfig) -> Self {
        Self {
            inner,
            profiles: MemoryCache::with_ttl(Duration::from_secs(config.slow_ttl_secs)),
        }
    }
}

#[async_trait]
impl<T: ProfileStore> ProfileStore for CachingProfiles<T> {
    async fn profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
        self.profiles
            .get_or_fetch(uid.to_string(), || self.inner.profile(uid))
            .await
    }

    async fn write_favorites(&self, uid: &str, favorites: &[String]) -> Result<(), StoreError> {
        self.inner.write_favorites(uid, favorites).await?;
        self.profiles.remove(&uid.to_string()).await;
        Ok(())
    }
}

pub struct CachingLedger<T: ConversionLedger> {
    inner: T,
    lists: MemoryCache<String, Vec<ConversionRecord>>,
}

impl<T: ConversionLedger> CachingLedger<T> {
    pub fn new(inner: T, config: &CacheConfig) -> Self {
        Self {
            inner,
            lists: MemoryCache::with_ttl(Duration::from_secs(config.slow_ttl_secs)),
        }
    }
}

#[async_trait]
impl<T: ConversionLedger> ConversionLedger for CachingLedger<T> {
    async fn list(&self, owner: &str) -> Result<Vec<ConversionRecord>, StoreError> {
        self.lists
            .get_or_fetch(owner.to_string(), || self.inner.list(owner))
            .await
    }

    async fn save(&self, record: &ConversionRecord) -> Result<(), StoreError> {
        self.inner.save(record).await?;
        if let Some(owner) = &record.owner {
            self.lists.remove(owner).await;
        }
        Ok(())
    }

    async fn delete(&self, owner: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete(owner, id).await?;
        self.lists.remove(&owner.to_string()).await;
        Ok(())
    }

    async fn clear(&self, owner: &str) -> Result<(), StoreError> {
        self.inner.clear(owner).await?;
        self.lists.remove(&owner.to_string()).await;
        Ok(())
    }
}
