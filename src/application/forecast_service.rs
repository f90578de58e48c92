use crate::application::ml::forecaster::forecast_scaled;
use crate::application::ml::predictor::SequenceModel;
use crate::domain::errors::{ForecastError, ModelError};
use crate::domain::ml::forecast::Forecast;
use crate::domain::ml::scaler::MinMaxScaler;
use crate::domain::ml::window::Window;
use crate::domain::ports::PriceHistoryProvider;
use std::sync::Arc;
use tracing::{debug, info};

/// Longest horizon a single request may ask for.
pub const MAX_FORECAST_DAYS: usize = 365;

/// Upper-case a raw ticker as received from clients.
pub fn normalize_ticker(raw: &str) -> String {
    raw.to_uppercase()
}

/// Request-scoped forecasting over shared, read-only collaborators.
///
/// Built once at startup and shared by every request handler. The model and
/// scaler are never mutated after construction.
pub struct ForecastService {
    provider: Arc<dyn PriceHistoryProvider>,
    model: Arc<dyn SequenceModel>,
    scaler: Arc<MinMaxScaler>,
    default_days: usize,
}

impl ForecastService {
    pub fn new(
        provider: Arc<dyn PriceHistoryProvider>,
        model: Arc<dyn SequenceModel>,
        scaler: Arc<MinMaxScaler>,
    ) -> Self {
        Self {
            provider,
            model,
            scaler,
            default_days: 2,
        }
    }

    pub fn with_default_days(mut self, days: usize) -> Self {
        self.default_days = days.clamp(1, MAX_FORECAST_DAYS);
        self
    }

    pub fn default_days(&self) -> usize {
        self.default_days
    }

    pub fn window_size(&self) -> usize {
        self.model.window_size()
    }

    /// fetch -> scale -> seed window -> autoregressive predict -> unscale.
    pub async fn forecast(&self, ticker: &str, days: usize) -> Result<Forecast, ForecastError> {
        let ticker = normalize_ticker(ticker);
        if days == 0 {
            return Err(ForecastError::invalid("days must be at least 1"));
        }
        if days > MAX_FORECAST_DAYS {
            return Err(ForecastError::invalid(format!(
                "days must be at most {MAX_FORECAST_DAYS}, got {days}"
            )));
        }
        if ticker.is_empty() {
            return Err(ForecastError::TickerNotFound { ticker });
        }

        let series = self.provider.daily_closes(&ticker).await?;
        let Some(last_date) = series.last_date() else {
            return Err(ForecastError::TickerNotFound { ticker });
        };
        debug!(
            "Fetched {} closes for {} via {} (last {})",
            series.len(),
            ticker,
            self.provider.name(),
            last_date
        );

        let scaled = self.scaler.transform(&series.closes());
        let window = Window::from_tail(&ticker, &scaled, self.model.window_size())?;

        let model = Arc::clone(&self.model);
        let predicted = tokio::task::spawn_blocking(move || {
            forecast_scaled(model.as_ref(), window, days)
        })
        .await
        .map_err(|e| ModelError::Task(e.to_string()))??;

        let prices = self.scaler.inverse_transform(&predicted);
        if let Some(bad) = prices.iter().copied().find(|p| !p.is_finite()) {
            return Err(ModelError::NonFinite(bad).into());
        }
        info!(
            "Forecast for {}: {} days after {} using {}",
            ticker,
            prices.len(),
            last_date,
            self.model.name()
        );

        Forecast::new(last_date, prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::{ConstantStepModel, MockPriceHistoryProvider};
    use chrono::NaiveDate;

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
    }

    fn service(provider: MockPriceHistoryProvider, window: usize) -> ForecastService {
        let scaler = MinMaxScaler::fit(&[100.0, 200.0]);
        ForecastService::new(
            Arc::new(provider),
            Arc::new(ConstantStepModel::new(window, 0.01)),
            Arc::new(scaler),
        )
    }

    #[tokio::test]
    async fn test_forecast_dates_follow_last_observation() {
        let provider = MockPriceHistoryProvider::new().with_synthetic("AAPL", end(), 80, 150.0);
        let svc = service(provider, 60);

        let forecast = svc.forecast("aapl", 3).await.unwrap();
        assert_eq!(forecast.horizon(), 3);
        assert_eq!(forecast.dates[0], NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        for pair in forecast.dates.windows(2) {
            assert_eq!((pair[1] - pair[0]).num_days(), 1);
        }
        // 0.01 scaled step == 1.0 price step with a 100..200 scaler
        assert!((forecast.forecast[1] - forecast.forecast[0] - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_ticker_is_not_found() {
        let svc = service(MockPriceHistoryProvider::new(), 60);
        let err = svc.forecast("zzzz", 2).await.unwrap_err();
        assert_eq!(err.to_string(), "No data found for ticker: ZZZZ");
    }

    #[tokio::test]
    async fn test_empty_ticker_is_not_found() {
        let svc = service(MockPriceHistoryProvider::new(), 60);
        assert!(svc.forecast("", 2).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_short_history_is_reported() {
        let provider = MockPriceHistoryProvider::new().with_synthetic("IPO", end(), 59, 20.0);
        let svc = service(provider, 60);
        let err = svc.forecast("IPO", 2).await.unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InsufficientHistory {
                available: 59,
                required: 60,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_zero_days_is_invalid() {
        let provider = MockPriceHistoryProvider::new().with_synthetic("AAPL", end(), 80, 150.0);
        let svc = service(provider, 60);
        assert!(matches!(
            svc.forecast("AAPL", 0).await,
            Err(ForecastError::InvalidRequest { .. })
        ));
    }

    #[tokio::test]
    async fn test_horizon_above_limit_is_invalid() {
        let provider = MockPriceHistoryProvider::new().with_synthetic("AAPL", end(), 80, 150.0);
        let svc = service(provider, 60);
        assert!(matches!(
            svc.forecast("AAPL", MAX_FORECAST_DAYS + 1).await,
            Err(ForecastError::InvalidRequest { .. })
        ));
        assert_eq!(
            svc.forecast("AAPL", MAX_FORECAST_DAYS).await.unwrap().horizon(),
            MAX_FORECAST_DAYS
        );
    }

    #[tokio::test]
    async fn test_non_finite_prices_are_rejected() {
        let provider = MockPriceHistoryProvider::new().with_synthetic("AAPL", end(), 80, 150.0);
        let flat_range = MinMaxScaler {
            feature_range: (0.5, 0.5),
            ..MinMaxScaler::fit(&[100.0, 200.0])
        };
        let svc = ForecastService::new(
            Arc::new(provider),
            Arc::new(ConstantStepModel::new(60, 0.01)),
            Arc::new(flat_range),
        );

        let err = svc.forecast("AAPL", 2).await.unwrap_err();
        assert!(matches!(err, ForecastError::Model(ModelError::NonFinite(_))));
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let provider = MockPriceHistoryProvider::new().with_failure("DOWN", "connection reset");
        let svc = service(provider, 60);
        let err = svc.forecast("down", 1).await.unwrap_err();
        assert!(matches!(err, ForecastError::Upstream(_)));
        assert!(err.to_string().contains("connection reset"));
    }
}
