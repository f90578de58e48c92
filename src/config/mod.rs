//! Configuration module for Pricecast.
//!
//! Service settings are loaded from environment variables (after `.env` is
//! applied by the binaries), organized by concern: Server and Market Data.
//! Trainer hyperparameters live in [`TrainingConfig`].

mod market_data_config;
mod server_config;
mod training_config;

pub use market_data_config::{MarketDataEnvConfig, MarketDataMode};
pub use server_config::ServerEnvConfig;
pub use training_config::TrainingConfig;

use anyhow::{Context, Result};

/// Main service configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerEnvConfig,
    pub market_data: MarketDataEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let server = ServerEnvConfig::from_env();
        let market_data =
            MarketDataEnvConfig::from_env().context("Failed to load market data config")?;

        Ok(Self {
            server,
            market_data,
        })
    }
}
