use super::dataset::WindowedDataset;
use super::lstm_model::{LstmPredictor, StackedLstm};
use crate::config::TrainingConfig;
use crate::domain::market::price_series::PriceSeries;
use crate::domain::ml::scaler::MinMaxScaler;
use crate::domain::ports::PriceHistoryProvider;
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{AdamW, Optimizer, ParamsAdamW, VarBuilder, VarMap, loss};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Summary of one training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub ticker: String,
    pub observations: usize,
    pub train_samples: usize,
    pub holdout_samples: usize,
    pub epoch_losses: Vec<f32>,
    /// Only computed when holdout evaluation was requested
    pub holdout_mse: Option<f32>,
}

impl TrainingReport {
    pub fn final_loss(&self) -> Option<f32> {
        self.epoch_losses.last().copied()
    }
}

/// Trained network with the scaler it was fitted against.
pub struct TrainedModel {
    varmap: VarMap,
    network: StackedLstm,
    pub scaler: MinMaxScaler,
    pub window_size: usize,
    pub report: TrainingReport,
}

impl TrainedModel {
    /// Write network weights in safetensors format.
    pub fn save_weights(&self, path: &Path) -> Result<()> {
        self.varmap
            .save(path)
            .with_context(|| format!("Failed to save model weights to {}", path.display()))
    }

    pub fn into_predictor(self) -> LstmPredictor {
        LstmPredictor::new(self.network, self.window_size)
    }
}

#[derive(Clone)]
pub struct Trainer {
    config: TrainingConfig,
    device: Device,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            device: Device::Cpu,
        })
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Fetch history for the configured ticker and fit on it.
    ///
    /// Fitting runs on the blocking pool.
    pub async fn fetch_and_fit(&self, provider: &dyn PriceHistoryProvider) -> Result<TrainedModel> {
        let ticker = self.config.ticker.to_uppercase();
        info!("Fetching 5y daily history for {} from {}", ticker, provider.name());
        let series = provider
            .daily_closes(&ticker)
            .await
            .with_context(|| format!("Failed to fetch history for {}", ticker))?;
        if series.is_empty() {
            anyhow::bail!("No data found for ticker: {}", ticker);
        }

        let trainer = self.clone();
        tokio::task::spawn_blocking(move || trainer.fit(&series))
            .await
            .context("Training task panicked")?
    }

    pub fn fit(&self, series: &PriceSeries) -> Result<TrainedModel> {
        let window_size = self.config.window_size;
        if series.len() <= window_size {
            anyhow::bail!(
                "Insufficient history for {}: {} observations, need more than {}",
                series.ticker(),
                series.len(),
                window_size
            );
        }

        let (scaled, scaler) = MinMaxScaler::fit_transform(&series.closes());
        info!(
            "Fitted scaler on {} closes (min {:.2}, max {:.2})",
            scaler.n_samples_seen, scaler.data_min, scaler.data_max
        );

        let dataset = WindowedDataset::from_series(&scaled, window_size);
        let (train, holdout) = dataset.split(self.config.train_split);
        if train.is_empty() {
            anyhow::bail!(
                "No training windows for {} after a {:.0}% split",
                series.ticker(),
                self.config.train_split * 100.0
            );
        }
        info!(
            "Built {} training windows, {} held out",
            train.len(),
            holdout.len()
        );

        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &self.device);
        let network = StackedLstm::new(self.config.architecture(), vb)?;

        let epoch_losses = self.run_epochs(&varmap, &network, &train)?;

        let holdout_mse = if self.config.evaluate_holdout {
            if holdout.is_empty() {
                warn!("Holdout evaluation requested but the holdout split is empty");
                None
            } else {
                let mse = self.evaluate(&network, &holdout)?;
                info!("Holdout MSE (scaled): {:.6}", mse);
                Some(mse)
            }
        } else {
            debug!("Holdout split of {} windows left unevaluated", holdout.len());
            None
        };

        Ok(TrainedModel {
            varmap,
            network,
            scaler,
            window_size,
            report: TrainingReport {
                ticker: series.ticker().to_string(),
                observations: series.len(),
                train_samples: train.len(),
                holdout_samples: holdout.len(),
                epoch_losses,
                holdout_mse,
            },
        })
    }

    fn tensors(&self, data: &WindowedDataset) -> Result<(Tensor, Tensor)> {
        let n = data.len();
        let xs = Tensor::from_slice(data.inputs.as_slice(), (n, data.window_size, 1), &self.device)?;
        let ys = Tensor::from_slice(data.targets.as_slice(), (n, 1), &self.device)?;
        Ok((xs, ys))
    }

    fn run_epochs(
        &self,
        varmap: &VarMap,
        network: &StackedLstm,
        train: &WindowedDataset,
    ) -> Result<Vec<f32>> {
        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-7,
            weight_decay: 0.0,
        };
        let mut optimizer = AdamW::new(varmap.all_vars(), params)?;

        let (xs, ys) = self.tensors(train)?;
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut order: Vec<u32> = (0..train.len() as u32).collect();
        let mut losses = Vec::with_capacity(self.config.epochs);

        for epoch in 1..=self.config.epochs {
            let started = Instant::now();
            order.shuffle(&mut rng);

            let mut total = 0f32;
            for batch in order.chunks(self.config.batch_size) {
                let idx = Tensor::from_slice(batch, batch.len(), &self.device)?;
                let batch_x = xs.index_select(&idx, 0)?;
                let batch_y = ys.index_select(&idx, 0)?;

                let predictions = network.forward_t(&batch_x, true)?;
                let batch_loss = loss::mse(&predictions, &batch_y)?;
                optimizer.backward_step(&batch_loss)?;

                total += batch_loss.to_scalar::<f32>()? * batch.len() as f32;
            }

            let epoch_loss = total / train.len() as f32;
            if !epoch_loss.is_finite() {
                anyhow::bail!("Training diverged at epoch {}: loss {}", epoch, epoch_loss);
            }
            info!(
                "Epoch {}/{} - loss: {:.6} ({:.1?})",
                epoch,
                self.config.epochs,
                epoch_loss,
                started.elapsed()
            );
            losses.push(epoch_loss);
        }

        Ok(losses)
    }

    fn evaluate(&self, network: &StackedLstm, data: &WindowedDataset) -> Result<f32> {
        let (xs, ys) = self.tensors(data)?;
        let predictions = network.forward_t(&xs, false)?;
        Ok(loss::mse(&predictions, &ys)?.to_scalar::<f32>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::predictor::SequenceModel;
    use crate::domain::market::price_series::PricePoint;
    use chrono::{Days, NaiveDate};

    fn tiny_config() -> TrainingConfig {
        TrainingConfig {
            ticker: "TEST".to_string(),
            window_size: 6,
            epochs: 3,
            batch_size: 8,
            lstm1_units: 4,
            lstm2_units: 3,
            dense_units: 2,
            seed: Some(42),
            ..TrainingConfig::default()
        }
    }

    fn series(len: usize) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let points = (0..len)
            .map(|i| {
                let date = start.checked_add_days(Days::new(i as u64)).unwrap();
                PricePoint::new(date, 100.0 + (i as f64 / 3.0).sin() * 5.0 + i as f64 * 0.1)
            })
            .collect();
        PriceSeries::new("TEST", points)
    }

    #[test]
    fn test_fit_reports_split_and_losses() {
        let trainer = Trainer::new(tiny_config()).unwrap();
        let trained = trainer.fit(&series(46)).unwrap();

        // 46 closes, window 6 -> 40 windows -> 32 train / 8 holdout
        assert_eq!(trained.report.train_samples, 32);
        assert_eq!(trained.report.holdout_samples, 8);
        assert_eq!(trained.report.epoch_losses.len(), 3);
        assert!(trained.report.final_loss().unwrap().is_finite());
        assert!(trained.report.holdout_mse.is_none());
        assert_eq!(trained.scaler.n_samples_seen, 46);
    }

    #[test]
    fn test_holdout_evaluation_is_opt_in() {
        let config = TrainingConfig {
            evaluate_holdout: true,
            ..tiny_config()
        };
        let trained = Trainer::new(config).unwrap().fit(&series(46)).unwrap();
        let mse = trained.report.holdout_mse.expect("holdout mse");
        assert!(mse.is_finite());
        assert!(mse >= 0.0);
    }

    #[test]
    fn test_fit_rejects_short_history() {
        let trainer = Trainer::new(tiny_config()).unwrap();
        let err = trainer.fit(&series(6)).err().unwrap();
        assert!(err.to_string().contains("Insufficient history"));
    }

    #[test]
    fn test_trained_predictor_produces_finite_values() {
        let trained = Trainer::new(tiny_config()).unwrap().fit(&series(30)).unwrap();
        let predictor = trained.into_predictor();
        let value = predictor
            .predict_next(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6])
            .unwrap();
        assert!(value.is_finite());
    }
}
