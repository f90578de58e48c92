use crate::domain::errors::MarketDataError;
use crate::domain::market::price_series::{PricePoint, PriceSeries};
use crate::domain::ports::PriceHistoryProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

/// One row of a daily price export.
///
/// Accepts Yahoo-style headers (`Date,Close,Adj Close`) and lower-case ones.
/// The optional ticker column lets one file carry several symbols.
#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Close", default)]
    close: Option<f64>,
    #[serde(alias = "Adj Close", alias = "adjclose", default)]
    adj_close: Option<f64>,
    #[serde(alias = "Ticker", alias = "Symbol", alias = "symbol", default)]
    ticker: Option<String>,
}

/// Offline price history read from a local CSV file.
///
/// Rows without a ticker value belong to every ticker, so a plain
/// single-symbol export works as-is.
pub struct CsvPriceHistoryProvider {
    path: PathBuf,
}

impl CsvPriceHistoryProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(ticker: &str, bytes: &[u8]) -> Result<PriceSeries, MarketDataError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let mut points = Vec::new();
        for row in reader.deserialize::<PriceRow>() {
            let row = row?;
            if let Some(row_ticker) = &row.ticker
                && !row_ticker.eq_ignore_ascii_case(ticker)
            {
                continue;
            }
            if let Some(close) = row.adj_close.or(row.close) {
                points.push(PricePoint::new(row.date, close));
            }
        }
        Ok(PriceSeries::new(ticker, points))
    }
}

#[async_trait]
impl PriceHistoryProvider for CsvPriceHistoryProvider {
    async fn daily_closes(&self, ticker: &str) -> Result<PriceSeries, MarketDataError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let series = Self::parse(ticker, &bytes)?;
        debug!(
            "CsvPriceHistoryProvider: {} -> {} closes from {}",
            ticker,
            series.len(),
            self.path.display()
        );
        Ok(series)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
