use super::predictor::SequenceModel;
use crate::domain::errors::{ArtifactError, ModelError};
use candle_core::{DType, Device, Module, Tensor};
use candle_nn::rnn::{LSTM, LSTMConfig, RNN, lstm};
use candle_nn::{Dropout, Linear, VarBuilder, linear};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Layer widths of the stacked recurrent network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LstmArchitecture {
    pub lstm1_units: usize,
    pub lstm2_units: usize,
    pub dense_units: usize,
    pub dropout: f32,
}

impl Default for LstmArchitecture {
    fn default() -> Self {
        Self {
            lstm1_units: 200,
            lstm2_units: 100,
            dense_units: 50,
            dropout: 0.15,
        }
    }
}

impl LstmArchitecture {
    /// Recover layer widths from saved weights. Dropout is not stored and
    /// does not apply at inference, so it keeps the default.
    fn from_tensors(tensors: &HashMap<String, Tensor>) -> Result<Self, String> {
        let dim = |name: &str, axis: usize| -> Result<usize, String> {
            let tensor = tensors
                .get(name)
                .ok_or_else(|| format!("missing tensor '{}'", name))?;
            tensor
                .dims()
                .get(axis)
                .copied()
                .ok_or_else(|| format!("tensor '{}' has shape {:?}", name, tensor.dims()))
        };

        Ok(Self {
            lstm1_units: dim("lstm1.weight_hh_l0", 1)?,
            lstm2_units: dim("lstm2.weight_hh_l0", 1)?,
            dense_units: dim("dense.weight", 0)?,
            ..Self::default()
        })
    }
}

/// LSTM(return sequences) -> Dropout -> LSTM -> Dropout -> Dense(ReLU) -> Dense(1)
#[derive(Debug, Clone)]
pub struct StackedLstm {
    lstm1: LSTM,
    lstm2: LSTM,
    dropout: Dropout,
    dense: Linear,
    output: Linear,
    architecture: LstmArchitecture,
}

impl StackedLstm {
    pub fn new(architecture: LstmArchitecture, vb: VarBuilder) -> candle_core::Result<Self> {
        let lstm1 = lstm(
            1,
            architecture.lstm1_units,
            LSTMConfig::default(),
            vb.pp("lstm1"),
        )?;
        let lstm2 = lstm(
            architecture.lstm1_units,
            architecture.lstm2_units,
            LSTMConfig::default(),
            vb.pp("lstm2"),
        )?;
        let dense = linear(architecture.lstm2_units, architecture.dense_units, vb.pp("dense"))?;
        let output = linear(architecture.dense_units, 1, vb.pp("output"))?;

        Ok(Self {
            lstm1,
            lstm2,
            dropout: Dropout::new(architecture.dropout),
            dense,
            output,
            architecture,
        })
    }

    pub fn architecture(&self) -> LstmArchitecture {
        self.architecture
    }

    /// `xs`: (batch, window, 1) -> (batch, 1). Dropout is active only when `train`.
    pub fn forward_t(&self, xs: &Tensor, train: bool) -> candle_core::Result<Tensor> {
        let states = self.lstm1.seq(xs)?;
        let sequence = self.lstm1.states_to_tensor(&states)?;
        let sequence = self.dropout.forward(&sequence, train)?;

        let states = self.lstm2.seq(&sequence)?;
        let last = states
            .last()
            .ok_or_else(|| candle_core::Error::Msg("empty input sequence".to_string()))?;
        let hidden = self.dropout.forward(last.h(), train)?;

        let hidden = self.dense.forward(&hidden)?.relu()?;
        self.output.forward(&hidden)
    }
}

/// Serving-side wrapper around a trained [`StackedLstm`].
pub struct LstmPredictor {
    network: StackedLstm,
    device: Device,
    window_size: usize,
}

impl LstmPredictor {
    pub fn new(network: StackedLstm, window_size: usize) -> Self {
        Self {
            network,
            device: Device::Cpu,
            window_size,
        }
    }

    pub fn from_safetensors(path: &Path, window_size: usize) -> Result<Self, ArtifactError> {
        let device = Device::Cpu;
        let tensors = candle_core::safetensors::load(path, &device)?;
        let architecture =
            LstmArchitecture::from_tensors(&tensors).map_err(|reason| ArtifactError::Model {
                path: path.display().to_string(),
                reason,
            })?;

        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);
        let network = StackedLstm::new(architecture, vb)?;
        info!(
            "Loaded LSTM model from {:?} (layers {}/{}/{}, window {})",
            path,
            architecture.lstm1_units,
            architecture.lstm2_units,
            architecture.dense_units,
            window_size
        );

        Ok(Self {
            network,
            device,
            window_size,
        })
    }

    pub fn architecture(&self) -> LstmArchitecture {
        self.network.architecture()
    }
}

impl SequenceModel for LstmPredictor {
    fn predict_next(&self, window: &[f64]) -> Result<f64, ModelError> {
        if window.len() != self.window_size {
            return Err(ModelError::WindowLength {
                expected: self.window_size,
                actual: window.len(),
            });
        }

        let data: Vec<f32> = window.iter().map(|&v| v as f32).collect();
        let input = Tensor::from_vec(data, (1, self.window_size, 1), &self.device)?;
        let output = self.network.forward_t(&input, false)?;

        let value = output
            .flatten_all()?
            .to_vec1::<f32>()?
            .first()
            .copied()
            .ok_or_else(|| candle_core::Error::Msg("empty model output".to_string()))?;

        Ok(value as f64)
    }

    fn window_size(&self) -> usize {
        self.window_size
    }

    fn name(&self) -> &str {
        "Stacked LSTM (candle)"
    }
}
