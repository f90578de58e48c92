// Request-scoped forecasting
pub mod forecast_service;

// Model, dataset and training loop
pub mod ml;
