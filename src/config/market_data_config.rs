//! Market data source configuration parsing from environment variables.

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Where daily price history comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketDataMode {
    Yahoo,
    Csv,
    Mock,
}

impl FromStr for MarketDataMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yahoo" => Ok(MarketDataMode::Yahoo),
            "csv" => Ok(MarketDataMode::Csv),
            "mock" => Ok(MarketDataMode::Mock),
            _ => anyhow::bail!(
                "Invalid MARKET_DATA_MODE: {}. Must be 'yahoo', 'csv', or 'mock'",
                s
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MarketDataEnvConfig {
    pub mode: MarketDataMode,
    pub yahoo_base_url: String,
    pub csv_path: PathBuf,
    pub http_timeout_secs: u64,
}

impl Default for MarketDataEnvConfig {
    fn default() -> Self {
        Self {
            mode: MarketDataMode::Yahoo,
            yahoo_base_url: "https://query1.finance.yahoo.com".to_string(),
            csv_path: PathBuf::from("data/prices.csv"),
            http_timeout_secs: 30,
        }
    }
}

impl MarketDataEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let mode = match env::var("MARKET_DATA_MODE") {
            Ok(value) => MarketDataMode::from_str(&value)?,
            Err(_) => defaults.mode,
        };

        Ok(Self {
            mode,
            yahoo_base_url: env::var("YAHOO_BASE_URL").unwrap_or(defaults.yahoo_base_url),
            csv_path: env::var("PRICE_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.csv_path),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing_is_case_insensitive() {
        assert_eq!(MarketDataMode::from_str("YAHOO").unwrap(), MarketDataMode::Yahoo);
        assert_eq!(MarketDataMode::from_str("Csv").unwrap(), MarketDataMode::Csv);
        assert_eq!(MarketDataMode::from_str("mock").unwrap(), MarketDataMode::Mock);
        assert!(MarketDataMode::from_str("bloomberg").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = MarketDataEnvConfig::default();
        assert_eq!(config.mode, MarketDataMode::Yahoo);
        assert!(config.yahoo_base_url.contains("finance.yahoo.com"));
        assert_eq!(config.http_timeout_secs, 30);
    }
}
