use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily observation: trading date and (adjusted) closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Chronologically ascending daily close series.
///
/// Construction normalizes whatever the provider returned: rows with a
/// non-finite close are dropped, rows are sorted by date and duplicate dates
/// keep the last observation seen. Once built the series is read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(ticker: impl Into<String>, points: Vec<PricePoint>) -> Self {
        let mut points: Vec<PricePoint> =
            points.into_iter().filter(|p| p.close.is_finite()).collect();

        // Stable sort keeps provider order among equal dates, so the
        // reverse-dedup below retains the latest row per date.
        points.sort_by_key(|p| p.date);
        points.reverse();
        points.dedup_by_key(|p| p.date);
        points.reverse();

        Self {
            ticker: ticker.into(),
            points,
        }
    }

    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            points: Vec::new(),
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}
