use crate::domain::errors::ForecastError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Forecast(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        if status.is_server_error() {
            error!("Forecast request failed: {msg}");
        }
        (status, Json(json!({ "error": msg }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = AppError::from(ForecastError::TickerNotFound {
            ticker: "ZZZZ".to_string(),
        });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "No data found for ticker: ZZZZ");

        let short = AppError::from(ForecastError::InsufficientHistory {
            ticker: "IPO".to_string(),
            available: 10,
            required: 60,
        });
        assert_eq!(short.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::MalformedBody("EOF".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
