use super::common::{ChartResponse, ChartResult};
use crate::domain::errors::MarketDataError;
use crate::domain::market::price_series::{PricePoint, PriceSeries};
use crate::domain::ports::PriceHistoryProvider;
use crate::infrastructure::core::http_client_factory::HttpClientFactory;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Lookback requested from the chart endpoint
pub const HISTORY_RANGE: &str = "5y";
pub const HISTORY_INTERVAL: &str = "1d";

/// Daily closes from the public Yahoo Finance chart API.
pub struct YahooPriceHistoryProvider {
    client: Client,
    base_url: String,
}

impl YahooPriceHistoryProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: HttpClientFactory::create_client(timeout),
            base_url: base_url.into(),
        }
    }

    fn chart_url(&self, ticker: &str) -> Result<Url, MarketDataError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| MarketDataError::InvalidData {
            symbol: ticker.to_string(),
            reason: format!("bad base url {}: {}", self.base_url, e),
        })?;
        url.path_segments_mut()
            .map_err(|_| MarketDataError::InvalidData {
                symbol: ticker.to_string(),
                reason: format!("base url {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(["v8", "finance", "chart", ticker]);
        url.query_pairs_mut()
            .append_pair("range", HISTORY_RANGE)
            .append_pair("interval", HISTORY_INTERVAL)
            .append_pair("includeAdjustedClose", "true");
        Ok(url)
    }
}

#[async_trait]
impl PriceHistoryProvider for YahooPriceHistoryProvider {
    async fn daily_closes(&self, ticker: &str) -> Result<PriceSeries, MarketDataError> {
        let url = self.chart_url(ticker)?;
        debug!("YahooPriceHistoryProvider: GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            info!("Yahoo has no chart for {}", ticker);
            return Ok(PriceSeries::empty(ticker));
        }
        if !status.is_success() {
            warn!("Yahoo chart request for {} failed: {}", ticker, status);
            return Err(MarketDataError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        parse_chart(ticker, &body)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Decode a chart payload into a close series.
///
/// Adjusted closes are preferred, raw closes are the fallback, and rows
/// without a value are dropped. A "Not Found" chart error is an empty series.
pub fn parse_chart(ticker: &str, body: &str) -> Result<PriceSeries, MarketDataError> {
    let invalid = |reason: String| MarketDataError::InvalidData {
        symbol: ticker.to_string(),
        reason,
    };

    let response: ChartResponse =
        serde_json::from_str(body).map_err(|e| invalid(format!("undecodable chart: {}", e)))?;

    if let Some(error) = response.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Ok(PriceSeries::empty(ticker));
        }
        return Err(invalid(format!("{}: {}", error.code, error.description)));
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::empty(ticker));
    };

    Ok(PriceSeries::new(ticker, closes(&result)))
}

fn closes(result: &ChartResult) -> Vec<PricePoint> {
    let adjusted = result
        .indicators
        .adjclose
        .first()
        .map(|block| block.adjclose.as_slice())
        .filter(|values| !values.is_empty());
    let raw = result
        .indicators
        .quote
        .first()
        .map(|block| block.close.as_slice())
        .unwrap_or_default();
    let values = adjusted.unwrap_or(raw);

    result
        .timestamp
        .iter()
        .zip(values)
        .filter_map(|(ts, close)| {
            let close = (*close)?;
            let date = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0)?.date_naive();
            Some(PricePoint::new(date, close))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    // 2024-06-12/13/14 at 13:30 UTC (09:30 New York)
    const CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "gmtoffset": -14400},
                "timestamp": [1718199000, 1718285400, 1718371800],
                "indicators": {
                    "quote": [{"close": [213.07, null, 212.49]}],
                    "adjclose": [{"adjclose": [212.5, null, 211.9]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_prefers_adjusted_and_drops_nulls() {
        let series = parse_chart("AAPL", CHART).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![212.5, 211.9]);
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 6, 14));
    }

    #[test]
    fn test_parse_chart_falls_back_to_raw_close() {
        let body = CHART.replace(r#""adjclose": [{"adjclose": [212.5, null, 211.9]}]"#, r#""adjclose": []"#);
        let series = parse_chart("AAPL", &body).unwrap();
        assert_eq!(series.closes(), vec![213.07, 212.49]);
    }

    #[test]
    fn test_not_found_error_is_empty_series() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        assert!(parse_chart("ZZZZ", body).unwrap().is_empty());
    }

    #[test]
    fn test_other_chart_errors_are_invalid_data() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid range"}}}"#;
        let err = parse_chart("AAPL", body).unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidData { .. }));
        assert!(err.to_string().contains("Invalid range"));
    }

    #[test]
    fn test_garbage_body_is_invalid_data() {
        assert!(parse_chart("AAPL", "<html>").is_err());
    }

    #[test]
    fn test_chart_url_shape() {
        let provider = YahooPriceHistoryProvider::new("https://query1.finance.yahoo.com/", Duration::from_secs(1));
        let url = provider.chart_url("BRK.B").unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/BRK.B");
        assert_eq!(
            url.query(),
            Some("range=5y&interval=1d&includeAdjustedClose=true")
        );
    }
}
