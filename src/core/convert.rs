//! Conversion engine: rate lookup, record stamping and best-effort
//! persistence.

use crate::core::accounts::ConversionLedger;
use crate::core::asset::ConversionRecord;
use crate::core::market::MarketDataProvider;
use crate::core::symbols;
use anyhow::{Result, bail, ensure};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of a conversion plus whether the ledger write went through.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub record: ConversionRecord,
    /// False when no owner was given, or when the ledger write failed.
    pub persisted: bool,
}

pub struct Converter {
    market: Arc<dyn MarketDataProvider>,
    ledger: Arc<dyn ConversionLedger>,
}

impl Converter {
    pub fn new(market: Arc<dyn MarketDataProvider>, ledger: Arc<dyn ConversionLedger>) -> Self {
        Self { market, ledger }
    }

    /// Converts `amount` of the asset behind `from_symbol` into
    /// `to_currency` at the current rate.
    ///
    /// With an owner the record is also written to the ledger. A failed
    /// write is logged and reported through [`ConversionOutcome::persisted`]
    /// but does not fail the conversion itself.
    pub async fn convert(
        &self,
        owner: Option<&str>,
        from_symbol: &str,
        to_currency: &str,
        amount: f64,
    ) -> Result<ConversionOutcome> {
        if !(amount > 0.0) {
            bail!("amount must be positive, got {amount}");
        }

        let asset_id = symbols::resolve(from_symbol);
        debug!(%from_symbol, %asset_id, %to_currency, amount, "Converting");

        let mut record = self.market.convert(&asset_id, to_currency, amount).await?;
        ensure!(
            record.rate > 0.0,
            "upstream returned a non-positive rate ({}) for {asset_id}",
            record.rate
        );

        record.from_symbol = from_symbol.trim().to_uppercase();
        record.owner = owner.map(str::to_string);

        let persisted = match owner {
            Some(owner) => match self.ledger.save(&record).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, owner, "Conversion computed but ledger write failed");
                    false
                }
            },
            None => false,
        };

        Ok(ConversionOutcome { record, persisted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::asset::Asset;
    use crate::core::error::{MarketError, StoreError};
    use crate::core::market::{AssetDetail, MarketChart};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedRateMarket {
        rate: f64,
    }

    #[async_trait]
    impl MarketDataProvider for FixedRateMarket {
        async fn top_assets(&self, _limit: u32) -> Result<Vec<Asset>, MarketError> {
            Ok(vec![])
        }

        async fn price(&self, asset_id: &str, currency: &str) -> Result<f64, MarketError> {
            if asset_id == "unknown-coin" {
                return Err(MarketError::NotFound(format!("{asset_id}.{currency}")));
            }
            Ok(self.rate)
        }

        async fn search(&self, _query: &str) -> Result<Vec<Asset>, MarketError> {
            Ok(vec![])
        }

        async fn chart(
            &self,
            _asset_id: &str,
            _days: u32,
            _currency: &str,
        ) -> Result<MarketChart, MarketError> {
            Ok(MarketChart::default())
        }

        async fn detail(&self, asset_id: &str) -> Result<AssetDetail, MarketError> {
            Ok(AssetDetail {
                id: asset_id.to_string(),
                symbol: asset_id.to_string(),
                name: asset_id.to_string(),
                market_cap_rank: None,
            })
        }
    }

    struct RecordingLedger {
        saved: Mutex<Vec<ConversionRecord>>,
        fail_saves: bool,
    }

    impl RecordingLedger {
        fn new(fail_saves: bool) -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
                fail_saves,
            }
        }
    }

    #[async_trait]
    impl ConversionLedger for RecordingLedger {
        async fn list(&self, owner: &str) -> Result<Vec<ConversionRecord>, StoreError> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.owner.as_deref() == Some(owner))
                .cloned()
                .collect())
        }

        async fn save(&self, record: &ConversionRecord) -> Result<(), StoreError> {
            if self.fail_saves {
                return Err(StoreError::Other("ledger unavailable".into()));
            }
            self.saved.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn delete(&self, _owner: &str, _id: &str) -> Result<(), StoreError> {
            Ok(())
        }

        async fn clear(&self, _owner: &str) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn converter(rate: f64, fail_saves: bool) -> (Converter, Arc<RecordingLedger>) {
        let ledger = Arc::new(RecordingLedger::new(fail_saves));
        let converter = Converter::new(Arc::new(FixedRateMarket { rate }), ledger.clone());
        (converter, ledger)
    }

    #[tokio::test]
    async fn test_result_is_amount_times_rate() {
        let (converter, _) = converter(42.5, false);
        let outcome = converter
            .convert(None, "BTC", "usd", 3.0)
            .await
            .unwrap();
        assert!((outcome.record.result - 3.0 * 42.5).abs() < 1e-9);
        assert_eq!(outcome.record.rate, 42.5);
        assert!(!outcome.persisted);
    }

    #[tokio::test]
    async fn test_eth_to_brl_scenario() {
        let (converter, ledger) = converter(12000.0, false);
        let outcome = converter
            .convert(Some("user-1"), "ETH", "BRL", 1.5)
            .await
            .unwrap();

        assert_eq!(outcome.record.from_symbol, "ETH");
        assert_eq!(outcome.record.to_symbol, "BRL");
        assert_eq!(outcome.record.amount, 1.5);
        assert_eq!(outcome.record.rate, 12000.0);
        assert_eq!(outcome.record.result, 18000.0);
        assert!(outcome.persisted);

        let saved = ledger.list("user-1").await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].result, 18000.0);
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_rejected() {
        let (converter, ledger) = converter(100.0, false);
        assert!(converter.convert(None, "BTC", "usd", 0.0).await.is_err());
        assert!(converter.convert(None, "BTC", "usd", -1.0).await.is_err());
        assert!(ledger.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ledger_failure_does_not_fail_conversion() {
        let (converter, _) = converter(50.0, true);
        let outcome = converter
            .convert(Some("user-1"), "BTC", "usd", 2.0)
            .await
            .unwrap();
        assert_eq!(outcome.record.result, 100.0);
        assert!(!outcome.persisted);
    }

    #[tokio::test]
    async fn test_unknown_asset_surfaces_not_found() {
        let (converter, _) = converter(50.0, false);
        // "UNKNOWN-COIN" is not in the symbol table, so it resolves to the
        // lowercased ticker that the mock rejects.
        let err = converter
            .convert(None, "UNKNOWN-COIN", "usd", 1.0)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
