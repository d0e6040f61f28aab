use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, error, instrument};

use crate::core::asset::Asset;
use crate::core::error::MarketError;
use crate::core::market::{AssetDetail, MarketChart, MarketDataProvider};

/// How many search hits get a second round-trip for market data.
const SEARCH_RESULT_LIMIT: usize = 10;

/// Gateway to the CoinGecko v3 API. Performs no caching of its own; the
/// caching wrapper owns freshness.
pub struct CoinGeckoProvider {
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str) -> Self {
        CoinGeckoProvider {
            base_url: base_url.to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MarketError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("Requesting market data from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("coinvert/0.1")
            .build()?;
        let response = client.get(&url).query(query).send().await.map_err(|e| {
            error!("Request error for {}: {}", endpoint, e);
            MarketError::Http(e)
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            error!("Upstream returned HTTP {} for {}", status, endpoint);
            return Err(MarketError::Upstream {
                status,
                endpoint: endpoint.to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse response from {}: {}", endpoint, e);
            MarketError::Parse(format!("{endpoint}: {e}"))
        })
    }

    async fn markets(&self, query: &[(&str, &str)]) -> Result<Vec<Asset>, MarketError> {
        let coins: Vec<MarketCoin> = self.get_json("/coins/markets", query).await?;
        Ok(coins.into_iter().map(Asset::from).collect())
    }
}

#[derive(Deserialize, Debug)]
struct MarketCoin {
    symbol: String,
    name: String,
    image: Option<String>,
    current_price: Option<f64>,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
    price_change_percentage_24h: Option<f64>,
}

impl From<MarketCoin> for Asset {
    fn from(coin: MarketCoin) -> Self {
        Asset {
            symbol: coin.symbol.to_uppercase(),
            name: coin.name,
            price: coin.current_price.unwrap_or(0.0),
            change_24h: coin.price_change_percentage_24h,
            market_cap: coin.market_cap,
            volume: coin.total_volume,
            image: coin.image,
        }
    }
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    coins: Vec<SearchCoin>,
}

#[derive(Deserialize, Debug)]
struct SearchCoin {
    id: String,
}

#[derive(Deserialize, Debug)]
struct ChartResponse {
    prices: Vec<[f64; 2]>,
    market_caps: Vec<[f64; 2]>,
    total_volumes: Vec<[f64; 2]>,
}

fn to_series(raw: Vec<[f64; 2]>) -> Vec<(i64, f64)> {
    raw.into_iter().map(|[ts, v]| (ts as i64, v)).collect()
}

#[derive(Deserialize, Debug)]
struct DetailResponse {
    id: String,
    symbol: String,
    name: String,
    market_cap_rank: Option<u32>,
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    #[instrument(name = "TopAssets", skip(self))]
    async fn top_assets(&self, limit: u32) -> Result<Vec<Asset>, MarketError> {
        let per_page = limit.to_string();
        let mut assets = self
            .markets(&[
                ("vs_currency", "usd"),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
            ])
            .await?;
        assets.truncate(limit as usize);
        Ok(assets)
    }

    #[instrument(name = "Price", skip(self), fields(asset = %asset_id, currency = %currency))]
    async fn price(&self, asset_id: &str, currency: &str) -> Result<f64, MarketError> {
        let currency = currency.to_lowercase();
        let prices: HashMap<String, HashMap<String, f64>> = self
            .get_json(
                "/simple/price",
                &[("ids", asset_id), ("vs_currencies", currency.as_str())],
            )
            .await?;

        // The upstream silently omits unknown ids and currencies, so both
        // keys are checked rather than assumed present.
        prices
            .get(asset_id)
            .and_then(|by_currency| by_currency.get(&currency))
            .copied()
            .ok_or_else(|| MarketError::NotFound(format!("{asset_id}.{currency}")))
    }

    #[instrument(name = "Search", skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Asset>, MarketError> {
        let response: SearchResponse = self.get_json("/search", &[("query", query)]).await?;

        let ids: Vec<String> = response
            .coins
            .into_iter()
            .take(SEARCH_RESULT_LIMIT)
            .map(|c| c.id)
            .collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        // Second round-trip for market data on the matched identifiers.
        let ids = ids.join(",");
        self.markets(&[
            ("vs_currency", "usd"),
            ("ids", ids.as_str()),
            ("order", "market_cap_desc"),
            ("sparkline", "false"),
        ])
        .await
    }

    #[instrument(name = "Chart", skip(self), fields(asset = %asset_id))]
    async fn chart(
        &self,
        asset_id: &str,
        days: u32,
        currency: &str,
    ) -> Result<MarketChart, MarketError> {
        let days = days.to_string();
        let response: ChartResponse = self
            .get_json(
                &format!("/coins/{asset_id}/market_chart"),
                &[("vs_currency", currency), ("days", days.as_str())],
            )
            .await?;

        Ok(MarketChart {
            prices: to_series(response.prices),
            market_caps: to_series(response.market_caps),
            total_volumes: to_series(response.total_volumes),
        })
    }

    #[instrument(name = "Detail", skip(self), fields(asset = %asset_id))]
    async fn detail(&self, asset_id: &str) -> Result<AssetDetail, MarketError> {
        let response: DetailResponse = self
            .get_json(
                &format!("/coins/{asset_id}"),
                &[
                    ("localization", "false"),
                    ("tickers", "false"),
                    ("market_data", "false"),
                    ("community_data", "false"),
                    ("developer_data", "false"),
                    ("sparkline", "false"),
                ],
            )
            .await?;

        Ok(AssetDetail {
            id: response.id,
            symbol: response.symbol.to_uppercase(),
            name: response.name,
            market_cap_rank: response.market_cap_rank,
        })
    }
}
