//! Offline trainer: fetch five years of daily closes, fit the stacked LSTM and
//! write the model/scaler pair the server loads.
//!
//! ```sh
//! cargo run --release --bin train -- --ticker AAPL --seed 7
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use pricecast::application::ml::Trainer;
use pricecast::config::{MarketDataEnvConfig, MarketDataMode, ServerEnvConfig, TrainingConfig};
use pricecast::infrastructure::{ArtifactStore, MarketDataFactory};
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker to train on
    #[arg(long)]
    ticker: Option<String>,

    /// TOML file with training hyperparameters; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    epochs: Option<usize>,

    #[arg(long)]
    batch_size: Option<usize>,

    /// Input window length in trading days
    #[arg(long)]
    window_size: Option<usize>,

    #[arg(long)]
    learning_rate: Option<f64>,

    /// Fixed seed for batch shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// Compute MSE on the trailing 20% after training
    #[arg(long)]
    evaluate_holdout: bool,

    /// Price source: yahoo, csv or mock (default: MARKET_DATA_MODE)
    #[arg(long)]
    source: Option<MarketDataMode>,

    /// CSV file used when the source is csv
    #[arg(long)]
    prices_csv: Option<PathBuf>,

    /// Output model weights (default: MODEL_PATH)
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Output scaler (default: SCALER_PATH)
    #[arg(long)]
    scaler_path: Option<PathBuf>,
}

impl Args {
    fn training_config(&self) -> Result<TrainingConfig> {
        let mut config = match &self.config {
            Some(path) => TrainingConfig::from_toml_file(path)?,
            None => TrainingConfig::default(),
        };
        if let Some(ticker) = &self.ticker {
            config.ticker = ticker.to_uppercase();
        }
        if let Some(epochs) = self.epochs {
            config.epochs = epochs;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(window_size) = self.window_size {
            config.window_size = window_size;
        }
        if let Some(lr) = self.learning_rate {
            config.learning_rate = lr;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.evaluate_holdout |= self.evaluate_holdout;
        Ok(config)
    }

    fn market_data_config(&self) -> Result<MarketDataEnvConfig> {
        let mut config = MarketDataEnvConfig::from_env()?;
        if let Some(mode) = self.source {
            config.mode = mode;
        }
        if let Some(path) = &self.prices_csv {
            config.csv_path = path.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let training = args.training_config()?;
    let market_data = args.market_data_config()?;
    let server = ServerEnvConfig::from_env();
    let store = ArtifactStore::new(
        args.model_path.clone().unwrap_or(server.model_path),
        args.scaler_path.clone().unwrap_or(server.scaler_path),
    );

    info!(
        "Training {} (window {}, {} epochs, batch {}, lr {})",
        training.ticker,
        training.window_size,
        training.epochs,
        training.batch_size,
        training.learning_rate
    );
    if server.window_size != training.window_size {
        info!(
            "Note: server window is {} but training window is {}; set FORECAST_WINDOW_SIZE={} when serving",
            server.window_size, training.window_size, training.window_size
        );
    }

    let provider = MarketDataFactory::create(&market_data);
    let trainer = Trainer::new(training)?;
    let trained = trainer
        .fetch_and_fit(provider.as_ref())
        .await
        .context("Training failed")?;
    store.save(&trained)?;

    let report = &trained.report;
    println!("\n=== Training Summary ===");
    println!("Ticker:          {}", report.ticker);
    println!("Observations:    {}", report.observations);
    println!("Train windows:   {}", report.train_samples);
    println!("Holdout windows: {}", report.holdout_samples);
    if let Some(loss) = report.final_loss() {
        println!("Final loss:      {:.6}", loss);
    }
    match report.holdout_mse {
        Some(mse) => println!("Holdout MSE:     {:.6}", mse),
        None => println!("Holdout MSE:     not evaluated (pass --evaluate-holdout)"),
    }
    println!("Model:           {}", store.model_path().display());
    println!("Scaler:          {}", store.scaler_path().display());

    Ok(())
}
