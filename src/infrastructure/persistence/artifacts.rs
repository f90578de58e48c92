use crate::application::ml::lstm_model::LstmPredictor;
use crate::application::ml::trainer::TrainedModel;
use crate::domain::errors::ArtifactError;
use crate::domain::ml::scaler::MinMaxScaler;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Location of the model/scaler pair written by the trainer and read by the
/// server. Both files must come from the same training run.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    model_path: PathBuf,
    scaler_path: PathBuf,
}

impl ArtifactStore {
    pub fn new(model_path: impl Into<PathBuf>, scaler_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            scaler_path: scaler_path.into(),
        }
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn scaler_path(&self) -> &Path {
        &self.scaler_path
    }

    /// Write both artifacts, replacing any previous pair.
    pub fn save(&self, trained: &TrainedModel) -> Result<()> {
        ensure_parent(&self.model_path)?;
        trained.save_weights(&self.model_path)?;
        self.save_scaler(&trained.scaler)?;
        info!(
            "Saved model to {} and scaler to {}",
            self.model_path.display(),
            self.scaler_path.display()
        );
        Ok(())
    }

    pub fn save_scaler(&self, scaler: &MinMaxScaler) -> Result<()> {
        ensure_parent(&self.scaler_path)?;
        let json = serde_json::to_string_pretty(scaler)?;
        fs::write(&self.scaler_path, json)
            .with_context(|| format!("Failed to write scaler to {}", self.scaler_path.display()))
    }

    pub fn load_scaler(&self) -> Result<MinMaxScaler, ArtifactError> {
        let path = display(&self.scaler_path);
        let raw = read_existing(&self.scaler_path)?;
        let scaler: MinMaxScaler = serde_json::from_slice(&raw).map_err(|source| {
            ArtifactError::Scaler {
                path: path.clone(),
                source,
            }
        })?;
        scaler
            .validate()
            .map_err(|reason| ArtifactError::ScalerRange { path, reason })?;
        info!(
            "Loaded scaler from {} (min {:.2}, max {:.2})",
            self.scaler_path.display(),
            scaler.data_min,
            scaler.data_max
        );
        Ok(scaler)
    }

    pub fn load_model(&self, window_size: usize) -> Result<LstmPredictor, ArtifactError> {
        if !self.model_path.exists() {
            return Err(ArtifactError::Missing {
                path: display(&self.model_path),
            });
        }
        LstmPredictor::from_safetensors(&self.model_path, window_size)
    }

    /// Load the pair as the server uses it.
    pub fn load(&self, window_size: usize) -> Result<(LstmPredictor, MinMaxScaler), ArtifactError> {
        let model = self.load_model(window_size)?;
        let scaler = self.load_scaler()?;
        Ok((model, scaler))
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn read_existing(path: &Path) -> Result<Vec<u8>, ArtifactError> {
    fs::read(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ArtifactError::Missing {
            path: display(path),
        },
        _ => ArtifactError::Io {
            path: display(path),
            source,
        },
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
