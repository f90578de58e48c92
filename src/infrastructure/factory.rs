use crate::config::{MarketDataEnvConfig, MarketDataMode};
use crate::domain::ports::PriceHistoryProvider;
use crate::infrastructure::csv_source::CsvPriceHistoryProvider;
use crate::infrastructure::mock::MockPriceHistoryProvider;
use crate::infrastructure::yahoo::YahooPriceHistoryProvider;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub struct MarketDataFactory;

impl MarketDataFactory {
    pub fn create(config: &MarketDataEnvConfig) -> Arc<dyn PriceHistoryProvider> {
        let provider: Arc<dyn PriceHistoryProvider> = match config.mode {
            MarketDataMode::Yahoo => Arc::new(YahooPriceHistoryProvider::new(
                config.yahoo_base_url.clone(),
                Duration::from_secs(config.http_timeout_secs),
            )),
            MarketDataMode::Csv => Arc::new(CsvPriceHistoryProvider::new(config.csv_path.clone())),
            MarketDataMode::Mock => {
                Arc::new(MockPriceHistoryProvider::demo(Utc::now().date_naive()))
            }
        };
        info!("Market data source: {}", provider.name());
        provider
    }
}
