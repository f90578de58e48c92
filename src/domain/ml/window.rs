use crate::domain::errors::ForecastError;
use std::collections::VecDeque;

/// Fixed-length input window for the sequence model.
///
/// The length set at construction never changes: `slide` drops the oldest
/// value for every value it appends.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    values: VecDeque<f64>,
}

impl Window {
    /// Seed a window from the last `size` values of a scaled series.
    pub fn from_tail(
        ticker: &str,
        scaled: &[f64],
        size: usize,
    ) -> Result<Self, ForecastError> {
        if size == 0 || scaled.len() < size {
            return Err(ForecastError::InsufficientHistory {
                ticker: ticker.to_string(),
                available: scaled.len(),
                required: size,
            });
        }

        Ok(Self {
            values: scaled[scaled.len() - size..].iter().copied().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn slide(&mut self, next: f64) {
        self.values.pop_front();
        self.values.push_back(next);
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_takes_tail() {
        let w = Window::from_tail("T", &[0.1, 0.2, 0.3, 0.4, 0.5], 3).unwrap();
        assert_eq!(w.to_vec(), vec![0.3, 0.4, 0.5]);
    }

    #[test]
    fn test_slide_keeps_length() {
        let mut w = Window::from_tail("T", &[1.0, 2.0, 3.0], 3).unwrap();
        w.slide(4.0);
        w.slide(5.0);
        assert_eq!(w.len(), 3);
        assert_eq!(w.to_vec(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_short_history_is_rejected() {
        let err = Window::from_tail("ACME", &[1.0, 2.0], 60).unwrap_err();
        match err {
            ForecastError::InsufficientHistory {
                ticker,
                available,
                required,
            } => {
                assert_eq!(ticker, "ACME");
                assert_eq!(available, 2);
                assert_eq!(required, 60);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
