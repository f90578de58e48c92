pub mod app_error;
pub mod forecast_handler;

use crate::application::forecast_service::ForecastService;
use axum::Router;
use axum::routing::post;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// `/forecast` plus the `/api/forecast` path the dashboard proxy forwards to.
pub fn router(service: Arc<ForecastService>) -> Router {
    Router::new()
        .route("/forecast", post(forecast_handler::forecast))
        .route("/api/forecast", post(forecast_handler::forecast))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}
