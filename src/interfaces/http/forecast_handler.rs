use super::app_error::{AppError, AppResult};
use crate::application::forecast_service::{ForecastService, MAX_FORECAST_DAYS, normalize_ticker};
use crate::domain::errors::ForecastError;
use crate::domain::ml::forecast::Forecast;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub ticker: Option<String>,
    /// `None` only when the field is absent; an explicit `null` is kept.
    #[serde(default, deserialize_with = "present")]
    pub days: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Resolve the requested horizon.
///
/// Integers, floats (truncated) and numeric strings are accepted. Anything
/// else, or a horizon outside `1..=MAX_FORECAST_DAYS`, is rejected.
pub fn parse_days(days: Option<&Value>, default: usize) -> Result<usize, ForecastError> {
    let Some(value) = days else {
        return Ok(default);
    };

    let parsed: Option<i64> = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|v| i64::try_from(v).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n > MAX_FORECAST_DAYS as i64 => Err(ForecastError::invalid(format!(
            "days must be at most {MAX_FORECAST_DAYS}, got {n}"
        ))),
        Some(n) if n >= 1 => usize::try_from(n).map_err(|_| ForecastError::invalid("days is too large")),
        Some(n) => Err(ForecastError::invalid(format!("days must be at least 1, got {n}"))),
        None => Err(ForecastError::invalid(format!("days must be an integer, got {value}"))),
    }
}

pub async fn forecast(
    State(service): State<Arc<ForecastService>>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> AppResult<Json<Forecast>> {
    let Json(request) = payload?;
    let ticker = normalize_ticker(request.ticker.as_deref().unwrap_or_default());
    let span = info_span!("forecast", request_id = %Uuid::new_v4(), ticker = %ticker);

    async move {
        let days = parse_days(request.days.as_ref(), service.default_days())?;
        info!("Forecasting {ticker} for {days} days");
        let forecast = service.forecast(&ticker, days).await?;
        Ok::<_, AppError>(Json(forecast))
    }
    .instrument(span)
    .await
}
