use crate::application::ml::predictor::SequenceModel;
use crate::domain::errors::{MarketDataError, ModelError};
use crate::domain::market::price_series::{PricePoint, PriceSeries};
use crate::domain::ports::PriceHistoryProvider;
use async_trait::async_trait;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use std::collections::HashMap;
use tracing::debug;

/// Tickers offered as quick picks by the dashboard client.
pub const DEMO_TICKERS: &[(&str, f64)] = &[
    ("AAPL", 180.0),
    ("MSFT", 410.0),
    ("GOOGL", 165.0),
    ("TSLA", 210.0),
    ("AMZN", 185.0),
];

/// Roughly five years of trading days
pub const FIVE_YEARS_OF_TRADING_DAYS: usize = 1260;

/// Deterministic weekday series ending on (or just before) `end`.
///
/// Prices drift upward with two superimposed oscillations so the series has
/// both trend and texture; the same inputs always give the same output.
pub fn synthetic_series(ticker: &str, end: NaiveDate, trading_days: usize, base: f64) -> PriceSeries {
    let mut dates = Vec::with_capacity(trading_days);
    let mut cursor = end;
    while dates.len() < trading_days {
        if !matches!(cursor.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(cursor);
        }
        match cursor.checked_sub_days(Days::new(1)) {
            Some(prev) => cursor = prev,
            None => break,
        }
    }
    dates.reverse();

    let points = dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let t = i as f64;
            let close = base * (1.0 + 0.0004 * t)
                + base * 0.03 * (t / 9.0).sin()
                + base * 0.01 * (t / 2.3).sin();
            PricePoint::new(date, close)
        })
        .collect();

    PriceSeries::new(ticker, points)
}

/// In-memory price history keyed by ticker.
///
/// Unknown tickers return an empty series; tickers registered with
/// [`with_failure`](Self::with_failure) return an upstream error.
#[derive(Debug, Clone, Default)]
pub struct MockPriceHistoryProvider {
    series: HashMap<String, PriceSeries>,
    failures: HashMap<String, String>,
}

impl MockPriceHistoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Five years of synthetic history for every [`DEMO_TICKERS`] entry.
    pub fn demo(end: NaiveDate) -> Self {
        DEMO_TICKERS
            .iter()
            .fold(Self::new(), |provider, (ticker, base)| {
                provider.with_synthetic(ticker, end, FIVE_YEARS_OF_TRADING_DAYS, *base)
            })
    }

    pub fn with_series(mut self, ticker: &str, points: Vec<PricePoint>) -> Self {
        let ticker = ticker.to_uppercase();
        self.series
            .insert(ticker.clone(), PriceSeries::new(ticker, points));
        self
    }

    pub fn with_synthetic(mut self, ticker: &str, end: NaiveDate, trading_days: usize, base: f64) -> Self {
        let ticker = ticker.to_uppercase();
        self.series.insert(
            ticker.clone(),
            synthetic_series(&ticker, end, trading_days, base),
        );
        self
    }

    pub fn with_failure(mut self, ticker: &str, reason: &str) -> Self {
        self.failures
            .insert(ticker.to_uppercase(), reason.to_string());
        self
    }
}

#[async_trait]
impl PriceHistoryProvider for MockPriceHistoryProvider {
    async fn daily_closes(&self, ticker: &str) -> Result<PriceSeries, MarketDataError> {
        if let Some(reason) = self.failures.get(ticker) {
            return Err(MarketDataError::InvalidData {
                symbol: ticker.to_string(),
                reason: reason.clone(),
            });
        }

        let series = self
            .series
            .get(ticker)
            .cloned()
            .unwrap_or_else(|| PriceSeries::empty(ticker));
        debug!("MockPriceHistoryProvider: {} -> {} closes", ticker, series.len());
        Ok(series)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Stub model: last value in the window plus a fixed step.
#[derive(Debug, Clone)]
pub struct ConstantStepModel {
    window_size: usize,
    step: f64,
}

impl ConstantStepModel {
    pub fn new(window_size: usize, step: f64) -> Self {
        Self { window_size, step }
    }
}

impl SequenceModel for ConstantStepModel {
    fn predict_next(&self, window: &[f64]) -> Result<f64, ModelError> {
        if window.len() != self.window_size {
            return Err(ModelError::WindowLength {
                expected: self.window_size,
                actual: window.len(),
            });
        }
        Ok(window.last().copied().unwrap_or_default() + self.step)
    }

    fn window_size(&self) -> usize {
        self.window_size
    }

    fn name(&self) -> &str {
        "constant-step"
    }
}
