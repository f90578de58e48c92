// Market data domain
pub mod market;

// Scaling, windowing and forecast types
pub mod ml;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
