use crate::config::{Config, MarketDataMode};
use std::env;
use std::sync::Mutex;
use std::sync::OnceLock;

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

const VARS: &[&str] = &[
    "FORECAST_BIND_ADDRESS",
    "FORECAST_PORT",
    "FORECAST_WINDOW_SIZE",
    "FORECAST_DEFAULT_DAYS",
    "MODEL_PATH",
    "SCALER_PATH",
    "MARKET_DATA_MODE",
    "HTTP_TIMEOUT_SECS",
];

fn clear() {
    for var in VARS {
        // SAFETY: serialized by ENV_LOCK
        unsafe { env::remove_var(var) };
    }
}

fn set(key: &str, value: &str) {
    // SAFETY: serialized by ENV_LOCK
    unsafe { env::set_var(key, value) };
}

#[test]
fn test_config_defaults_without_env() {
    let _guard = get_env_lock().lock().unwrap();
    clear();

    let config = Config::from_env().unwrap();
    assert_eq!(config.server.socket_address(), "127.0.0.1:5000");
    assert_eq!(config.server.window_size, 60);
    assert_eq!(config.server.default_days, 2);
    assert_eq!(config.market_data.mode, MarketDataMode::Yahoo);
}

#[test]
fn test_config_reads_overrides() {
    let _guard = get_env_lock().lock().unwrap();
    clear();
    set("FORECAST_BIND_ADDRESS", "0.0.0.0");
    set("FORECAST_PORT", "8080");
    set("FORECAST_DEFAULT_DAYS", "7");
    set("MODEL_PATH", "models/aapl.safetensors");
    set("MARKET_DATA_MODE", "mock");
    set("HTTP_TIMEOUT_SECS", "5");

    let config = Config::from_env().unwrap();
    assert_eq!(config.server.socket_address(), "0.0.0.0:8080");
    assert_eq!(config.server.default_days, 7);
    assert_eq!(
        config.server.model_path.to_str(),
        Some("models/aapl.safetensors")
    );
    assert_eq!(config.market_data.mode, MarketDataMode::Mock);
    assert_eq!(config.market_data.http_timeout_secs, 5);

    clear();
}

#[test]
fn test_soft_values_fall_back_and_mode_is_strict() {
    let _guard = get_env_lock().lock().unwrap();
    clear();
    set("FORECAST_PORT", "not-a-port");
    set("FORECAST_DEFAULT_DAYS", "0");

    let config = Config::from_env().unwrap();
    assert_eq!(config.server.port, 5000);
    assert_eq!(config.server.default_days, 2);

    set("MARKET_DATA_MODE", "bloomberg");
    assert!(Config::from_env().is_err());

    clear();
}
