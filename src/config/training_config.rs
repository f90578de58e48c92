//! Trainer hyperparameters.
//!
//! Defaults reproduce the reference training run. A TOML file may override
//! any subset of fields; CLI flags are applied on top by the `train` binary.

use crate::application::ml::lstm_model::LstmArchitecture;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Ticker whose history the model is fitted on
    pub ticker: String,
    pub window_size: usize,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    /// Share of windows (in time order) used for training; the rest is held out
    pub train_split: f64,
    pub lstm1_units: usize,
    pub lstm2_units: usize,
    pub dense_units: usize,
    pub dropout: f32,
    /// Fixed seed for batch shuffling; random when absent
    pub seed: Option<u64>,
    /// Report holdout MSE after training
    pub evaluate_holdout: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        let architecture = LstmArchitecture::default();
        Self {
            ticker: "AAPL".to_string(),
            window_size: 60,
            epochs: 100,
            batch_size: 32,
            learning_rate: 0.001,
            train_split: 0.8,
            lstm1_units: architecture.lstm1_units,
            lstm2_units: architecture.lstm2_units,
            dense_units: architecture.dense_units,
            dropout: architecture.dropout,
            seed: None,
            evaluate_holdout: false,
        }
    }
}

impl TrainingConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read training config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse training config TOML: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TrainingConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn architecture(&self) -> LstmArchitecture {
        LstmArchitecture {
            lstm1_units: self.lstm1_units,
            lstm2_units: self.lstm2_units,
            dense_units: self.dense_units,
            dropout: self.dropout,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            anyhow::bail!("Training ticker must not be empty");
        }
        if self.window_size == 0 || self.epochs == 0 || self.batch_size == 0 {
            anyhow::bail!(
                "window_size, epochs and batch_size must be positive (got {}, {}, {})",
                self.window_size,
                self.epochs,
                self.batch_size
            );
        }
        if !(self.train_split > 0.0 && self.train_split <= 1.0) {
            anyhow::bail!("train_split must be in (0, 1], got {}", self.train_split);
        }
        if !(0.0..1.0).contains(&self.dropout) {
            anyhow::bail!("dropout must be in [0, 1), got {}", self.dropout);
        }
        if self.learning_rate <= 0.0 {
            anyhow::bail!("learning_rate must be positive, got {}", self.learning_rate);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = TrainingConfig::default();
        assert_eq!(config.ticker, "AAPL");
        assert_eq!(config.window_size, 60);
        assert_eq!(config.epochs, 100);
        assert_eq!(config.batch_size, 32);
        assert_eq!(config.architecture(), LstmArchitecture::default());
        assert!(!config.evaluate_holdout);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TrainingConfig::from_toml_str(
            r#"
            ticker = "MSFT"
            epochs = 5
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.ticker, "MSFT");
        assert_eq!(config.epochs, 5);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.batch_size, 32);
        assert_eq!(config.lstm1_units, 200);
    }

    #[test]
    fn test_invalid_split_rejected() {
        assert!(TrainingConfig::from_toml_str("train_split = 0.0").is_err());
        assert!(TrainingConfig::from_toml_str("train_split = 1.5").is_err());
    }
}
