use crate::domain::errors::ModelError;

/// Interface for one-step sequence models
pub trait SequenceModel: Send + Sync {
    /// Predict the next scaled value from a window of scaled values.
    /// `window.len()` must equal `window_size()`.
    fn predict_next(&self, window: &[f64]) -> Result<f64, ModelError>;

    /// Number of consecutive values consumed per prediction
    fn window_size(&self) -> usize;

    /// Get model name/type
    fn name(&self) -> &str;
}
