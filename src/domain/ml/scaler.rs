use serde::{Deserialize, Serialize};

/// Fit-once / transform-many linear scaler for a single feature.
///
/// `transform` maps the fitted `[data_min, data_max]` onto `feature_range`.
/// Values outside the fitted range extrapolate linearly; nothing is clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: f64,
    pub data_max: f64,
    pub feature_range: (f64, f64),
    /// Number of samples seen during fitting.
    pub n_samples_seen: usize,
}

impl MinMaxScaler {
    pub const DEFAULT_RANGE: (f64, f64) = (0.0, 1.0);

    pub fn fit(values: &[f64]) -> Self {
        Self::fit_with_range(values, Self::DEFAULT_RANGE)
    }

    pub fn fit_with_range(values: &[f64], feature_range: (f64, f64)) -> Self {
        let data_min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let data_max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let (data_min, data_max) = if values.is_empty() {
            (0.0, 0.0)
        } else {
            (data_min, data_max)
        };

        Self {
            data_min,
            data_max,
            feature_range,
            n_samples_seen: values.len(),
        }
    }

    /// Checks that both directions of the mapping are finite and invertible.
    pub fn validate(&self) -> Result<(), String> {
        if !self.data_min.is_finite() || !self.data_max.is_finite() {
            return Err(format!(
                "data range [{}, {}] is not finite",
                self.data_min, self.data_max
            ));
        }
        if self.data_min > self.data_max {
            return Err(format!(
                "data_min {} exceeds data_max {}",
                self.data_min, self.data_max
            ));
        }
        let (low, high) = self.feature_range;
        if !low.is_finite() || !high.is_finite() || high <= low {
            return Err(format!("feature_range ({low}, {high}) is empty or not finite"));
        }
        Ok(())
    }

    pub fn fit_transform(values: &[f64]) -> (Vec<f64>, Self) {
        let scaler = Self::fit(values);
        (scaler.transform(values), scaler)
    }

    /// Multiplicative factor applied after shifting by `data_min`.
    /// A constant fitted series gets a unit data range.
    fn scale(&self) -> f64 {
        let data_range = self.data_max - self.data_min;
        let data_range = if data_range == 0.0 { 1.0 } else { data_range };
        (self.feature_range.1 - self.feature_range.0) / data_range
    }

    pub fn transform_one(&self, value: f64) -> f64 {
        (value - self.data_min) * self.scale() + self.feature_range.0
    }

    pub fn inverse_transform_one(&self, scaled: f64) -> f64 {
        (scaled - self.feature_range.0) / self.scale() + self.data_min
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform_one(v)).collect()
    }

    pub fn inverse_transform(&self, scaled: &[f64]) -> Vec<f64> {
        scaled.iter().map(|&v| self.inverse_transform_one(v)).collect()
    }
}
