use crate::domain::errors::MarketDataError;
use crate::domain::market::price_series::PriceSeries;
use async_trait::async_trait;

/// Source of daily close history.
///
/// Implementations return the trailing five years of daily, split/dividend
/// adjusted closes in ascending date order. An unknown ticker, or one with no
/// data in range, yields an empty series rather than an error.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    async fn daily_closes(&self, ticker: &str) -> Result<PriceSeries, MarketDataError>;

    /// Short label used in logs
    fn name(&self) -> &str;
}
