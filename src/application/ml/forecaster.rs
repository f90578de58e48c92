use super::predictor::SequenceModel;
use crate::domain::errors::ModelError;
use crate::domain::ml::window::Window;
use tracing::trace;

/// Autoregressive multi-step forecast from a one-step model.
///
/// Each prediction is appended to the window (oldest value dropped) before
/// the next step, so step `k` sees predictions `1..k` instead of observed
/// values. Returns `horizon` scaled predictions in order.
pub fn forecast_scaled(
    model: &dyn SequenceModel,
    mut window: Window,
    horizon: usize,
) -> Result<Vec<f64>, ModelError> {
    if window.len() != model.window_size() {
        return Err(ModelError::WindowLength {
            expected: model.window_size(),
            actual: window.len(),
        });
    }

    let mut predictions = Vec::new();
    for step in 0..horizon {
        let next = model.predict_next(&window.to_vec())?;
        if !next.is_finite() {
            return Err(ModelError::NonFinite(next));
        }
        trace!("{} step {}: {:.6}", model.name(), step + 1, next);
        predictions.push(next);
        window.slide(next);
    }

    Ok(predictions)
}
