//! Client state layer for market reads.
//!
//! Every read is a query keyed by operation name and parameters. The last
//! successful result is served for a bounded freshness window, concurrent
//! misses on the same key are coalesced into one fetch, and transient
//! upstream failures are retried a fixed number of times. Errors are never
//! cached. Conversions pass through so they always see a live rate.

use crate::core::asset::{Asset, ConversionRecord};
use crate::core::config::CacheConfig;
use crate::core::error::MarketError;
use crate::core::market::{AssetDetail, MarketChart, MarketDataProvider};
use crate::providers::util::with_retry;
use crate::store::memory::MemoryCache;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Queries shorter than this never reach the network.
pub const MIN_SEARCH_LEN: usize = 3;

pub struct CachingMarketProvider<T: MarketDataProvider> {
    inner: T,
    markets: MemoryCache<String, Vec<Asset>>,
    prices: MemoryCache<String, f64>,
    searches: MemoryCache<String, Vec<Asset>>,
    charts: MemoryCache<String, MarketChart>,
    details: MemoryCache<String, AssetDetail>,
    retries: usize,
    retry_delay_ms: u64,
}

impl<T: MarketDataProvider> CachingMarketProvider<T> {
    pub fn new(inner: T, config: &CacheConfig) -> Self {
        let price_ttl = Duration::from_secs(config.price_ttl_secs);
        let slow_ttl = Duration::from_secs(config.slow_ttl_secs);
        Self {
            inner,
            markets: MemoryCache::with_ttl(price_ttl),
            prices: MemoryCache::with_ttl(price_ttl),
            searches: MemoryCache::with_ttl(slow_ttl),
            charts: MemoryCache::with_ttl(slow_ttl),
            details: MemoryCache::with_ttl(slow_ttl),
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
        }
    }
}

#[async_trait]
impl<T: MarketDataProvider> MarketDataProvider for CachingMarketProvider<T> {
    async fn top_assets(&self, limit: u32) -> Result<Vec<Asset>, MarketError> {
        self.markets
            .get_or_fetch(format!("markets:{limit}"), || {
                with_retry(
                    || self.inner.top_assets(limit),
                    self.retries,
                    self.retry_delay_ms,
                )
            })
            .await
    }

    async fn price(&self, asset_id: &str, currency: &str) -> Result<f64, MarketError> {
        self.prices
            .get_or_fetch(
                format!("price:{asset_id}:{}", currency.to_lowercase()),
                || {
                    with_retry(
                        || self.inner.price(asset_id, currency),
                        self.retries,
                        self.retry_delay_ms,
                    )
                },
            )
            .await
    }

    async fn search(&self, query: &str) -> Result<Vec<Asset>, MarketError> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_LEN {
            debug!("Search query {:?} below minimum length, skipping fetch", query);
            return Ok(Vec::new());
        }

        self.searches
            .get_or_fetch(format!("search:{}", query.to_lowercase()), || {
                with_retry(
                    || self.inner.search(query),
                    self.retries,
                    self.retry_delay_ms,
                )
            })
            .await
    }

    async fn chart(
        &self,
        asset_id: &str,
        days: u32,
        currency: &str,
    ) -> Result<MarketChart, MarketError> {
        self.charts
            .get_or_fetch(
                format!("chart:{asset_id}:{days}:{}", currency.to_lowercase()),
                || {
                    with_retry(
                        || self.inner.chart(asset_id, days, currency),
                        self.retries,
                        self.retry_delay_ms,
                    )
                },
            )
            .await
    }

    async fn detail(&self, asset_id: &str) -> Result<AssetDetail, MarketError> {
        self.details
            .get_or_fetch(format!("detail:{asset_id}"), || {
                with_retry(
                    || self.inner.detail(asset_id),
                    self.retries,
                    self.retry_delay_ms,
                )
            })
            .await
    }

    async fn convert(
        &self,
        asset_id: &str,
        to_currency: &str,
        amount: f64,
    ) -> Result<ConversionRecord, MarketError> {
        self.inner.convert(asset_id, to_currency, amount).await
    }
}
