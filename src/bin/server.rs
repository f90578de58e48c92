//! Pricecast Server - HTTP forecast endpoint
//!
//! Loads the model/scaler pair produced by the `train` binary and answers
//! `POST /forecast`. Artifact problems are fatal before the port is bound.
//!
//! # Usage
//! ```sh
//! MARKET_DATA_MODE=yahoo FORECAST_PORT=5000 cargo run --bin server
//! ```
//!
//! # Environment Variables
//! - `MODEL_PATH` / `SCALER_PATH` - artifact locations
//! - `FORECAST_BIND_ADDRESS` / `FORECAST_PORT` - listener (default: 127.0.0.1:5000)
//! - `MARKET_DATA_MODE` - `yahoo`, `csv` or `mock` (default: yahoo)

use anyhow::{Context, Result};
use pricecast::application::forecast_service::ForecastService;
use pricecast::config::Config;
use pricecast::infrastructure::{ArtifactStore, MarketDataFactory};
use pricecast::interfaces::http;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    info!("Pricecast Server {} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;
    info!(
        "Configuration loaded: Source={:?}, Model={}, Scaler={}, Window={}",
        config.market_data.mode,
        config.server.model_path.display(),
        config.server.scaler_path.display(),
        config.server.window_size
    );

    let store = ArtifactStore::new(&config.server.model_path, &config.server.scaler_path);
    let (model, scaler) = store
        .load(config.server.window_size)
        .context("Failed to load model artifacts; run the `train` binary first")?;

    let provider = MarketDataFactory::create(&config.market_data);
    let service = ForecastService::new(provider, Arc::new(model), Arc::new(scaler))
        .with_default_days(config.server.default_days);

    let router = http::router(Arc::new(service));
    let address = config.server.socket_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Listening on http://{address} (POST /forecast)");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("Shutdown signal received. Exiting...");
        })
        .await
        .context("Http server failed")?;

    Ok(())
}
