use thiserror::Error;

/// Errors raised while talking to a market data provider
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Request to market data provider failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Market data provider returned HTTP {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Malformed market data for {symbol}: {reason}")]
    InvalidData { symbol: String, reason: String },

    #[error("Failed to read price file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse price file: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised by the sequence model during inference
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model expects a window of {expected} values, got {actual}")]
    WindowLength { expected: usize, actual: usize },

    #[error("Tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("Model produced a non-finite value: {0}")]
    NonFinite(f64),

    #[error("Inference task failed: {0}")]
    Task(String),
}

/// Errors raised when loading or saving the model/scaler artifact pair
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {path}")]
    Missing { path: String },

    #[error("Failed to access artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scaler artifact {path}: {source}")]
    Scaler {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unusable scaler artifact {path}: {reason}")]
    ScalerRange { path: String, reason: String },

    #[error("Invalid model artifact {path}: {reason}")]
    Model { path: String, reason: String },

    #[error("Tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),
}

/// Per-request forecast failures.
///
/// The HTTP layer maps `TickerNotFound` to 404 and everything else to 500.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("No data found for ticker: {ticker}")]
    TickerNotFound { ticker: String },

    #[error("Insufficient history for {ticker}: {available} trading days available, {required} required")]
    InsufficientHistory {
        ticker: String,
        available: usize,
        required: usize,
    },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error(transparent)]
    Upstream(#[from] MarketDataError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ForecastError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        ForecastError::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ForecastError::TickerNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ForecastError::TickerNotFound {
            ticker: "ZZZZ".to_string(),
        };
        assert_eq!(err.to_string(), "No data found for ticker: ZZZZ");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_insufficient_history_formatting() {
        let err = ForecastError::InsufficientHistory {
            ticker: "NEWCO".to_string(),
            available: 12,
            required: 60,
        };

        let msg = err.to_string();
        assert!(msg.contains("NEWCO"));
        assert!(msg.contains("12"));
        assert!(msg.contains("60"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_upstream_error_is_transparent() {
        let err: ForecastError = MarketDataError::InvalidData {
            symbol: "AAPL".to_string(),
            reason: "missing timestamps".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Malformed market data for AAPL: missing timestamps"
        );
    }
}
