//! Forecast service configuration parsing from environment variables.

use std::env;
use std::path::PathBuf;

/// Listener, artifact and forecasting defaults for the `server` binary
#[derive(Debug, Clone)]
pub struct ServerEnvConfig {
    pub bind_address: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    pub window_size: usize,
    pub default_days: usize,
}

impl Default for ServerEnvConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 5000,
            model_path: PathBuf::from("lstm_model.safetensors"),
            scaler_path: PathBuf::from("scaler.json"),
            window_size: 60,
            default_days: 2,
        }
    }
}

impl ServerEnvConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: env::var("FORECAST_BIND_ADDRESS").unwrap_or(defaults.bind_address),
            port: env::var("FORECAST_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            model_path: env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            scaler_path: env::var("SCALER_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.scaler_path),
            window_size: env::var("FORECAST_WINDOW_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&v: &usize| v > 0)
                .unwrap_or(defaults.window_size),
            default_days: env::var("FORECAST_DEFAULT_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&v: &usize| v > 0)
                .unwrap_or(defaults.default_days),
        }
    }

    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
