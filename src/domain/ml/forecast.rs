use crate::domain::errors::ForecastError;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Multi-day price forecast for one ticker.
///
/// `dates[i]` pairs with `forecast[i]`. Dates are consecutive calendar days
/// after the last observed close; weekends and holidays are not skipped.
/// Values beyond the first step are built on earlier predictions and carry no
/// uncertainty estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub dates: Vec<NaiveDate>,
    pub forecast: Vec<f64>,
}

impl Forecast {
    /// Fails when the dates would run past the last representable day.
    pub fn new(last_observed: NaiveDate, prices: Vec<f64>) -> Result<Self, ForecastError> {
        let dates = future_dates(last_observed, prices.len()).ok_or_else(|| {
            ForecastError::invalid(format!(
                "{} forecast days after {} exceed the supported calendar",
                prices.len(),
                last_observed
            ))
        })?;
        Ok(Self {
            dates,
            forecast: prices,
        })
    }

    pub fn horizon(&self) -> usize {
        self.forecast.len()
    }
}

/// The `count` calendar days following `last`, or `None` on date overflow.
pub fn future_dates(last: NaiveDate, count: usize) -> Option<Vec<NaiveDate>> {
    (1..=count as u64)
        .map(|offset| last.checked_add_days(Days::new(offset)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_future_dates_cross_weekend_and_month() {
        // 2024-01-31 is a Wednesday
        let last = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let dates = future_dates(last, 4).unwrap();
        let rendered: Vec<String> = dates.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["2024-02-01", "2024-02-02", "2024-02-03", "2024-02-04"]
        );
    }

    #[test]
    fn test_forecast_serializes_iso_dates() {
        let last = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let forecast = Forecast::new(last, vec![190.5, 191.25]).unwrap();
        let json = serde_json::to_value(&forecast).unwrap();
        assert_eq!(json["dates"][0], "2024-02-29");
        assert_eq!(json["dates"][1], "2024-03-01");
        assert_eq!(json["forecast"][1], 191.25);
        assert_eq!(forecast.horizon(), 2);
    }

    #[test]
    fn test_date_overflow_is_an_error() {
        let last = NaiveDate::MAX.pred_opt().unwrap();
        assert_eq!(future_dates(last, 1), Some(vec![NaiveDate::MAX]));
        assert_eq!(future_dates(last, 2), None);

        let err = Forecast::new(last, vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidRequest { .. }));
    }
}
