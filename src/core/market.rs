//! Market-data abstractions

use crate::core::asset::{Asset, ConversionRecord};
use crate::core::error::MarketError;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One `(unix millis, value)` sample of a time series.
pub type SeriesPoint = (i64, f64);

/// Three parallel time series over a trailing window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketChart {
    pub prices: Vec<SeriesPoint>,
    pub market_caps: Vec<SeriesPoint>,
    pub total_volumes: Vec<SeriesPoint>,
}

/// Summary data for a single asset, from the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDetail {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub market_cap_rank: Option<u32>,
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Top assets ranked by market capitalization, descending.
    async fn top_assets(&self, limit: u32) -> Result<Vec<Asset>, MarketError>;

    /// Current unit price of `asset_id` expressed in `currency`.
    async fn price(&self, asset_id: &str, currency: &str) -> Result<f64, MarketError>;

    /// Top matches for a free-text query, with market data attached.
    async fn search(&self, query: &str) -> Result<Vec<Asset>, MarketError>;

    /// Price, market-cap and volume series over the trailing `days` window.
    async fn chart(
        &self,
        asset_id: &str,
        days: u32,
        currency: &str,
    ) -> Result<MarketChart, MarketError>;

    /// Detail lookup for a single asset.
    async fn detail(&self, asset_id: &str) -> Result<AssetDetail, MarketError>;

    /// Computes `amount * rate` at the current rate, stamping an id and
    /// timestamp. The returned record carries no owner; persistence is the
    /// conversion engine's concern.
    async fn convert(
        &self,
        asset_id: &str,
        to_currency: &str,
        amount: f64,
    ) -> Result<ConversionRecord, MarketError> {
        let rate = self.price(asset_id, &to_currency.to_lowercase()).await?;
        let now = Utc::now();
        Ok(ConversionRecord {
            id: now.timestamp_millis().to_string(),
            owner: None,
            from_symbol: asset_id.to_uppercase(),
            to_symbol: to_currency.to_uppercase(),
            amount,
            result: amount * rate,
            rate,
            timestamp: now,
        })
    }
}
