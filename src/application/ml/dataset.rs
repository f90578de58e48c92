/// Supervised (window -> next value) pairs cut from a scaled series.
///
/// Inputs are stored flat, `window_size` values per sample, in the layout
/// expected by a `(samples, window, 1)` tensor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowedDataset {
    pub inputs: Vec<f32>,
    pub targets: Vec<f32>,
    pub window_size: usize,
}

impl WindowedDataset {
    /// One sample per position where a full window plus its target fits,
    /// sliding one step at a time.
    pub fn from_series(scaled: &[f64], window_size: usize) -> Self {
        let samples = if window_size == 0 {
            0
        } else {
            scaled.len().saturating_sub(window_size)
        };

        let mut inputs = Vec::with_capacity(samples * window_size);
        let mut targets = Vec::with_capacity(samples);
        for start in 0..samples {
            inputs.extend(scaled[start..start + window_size].iter().map(|&v| v as f32));
            targets.push(scaled[start + window_size] as f32);
        }

        Self {
            inputs,
            targets,
            window_size,
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn sample(&self, index: usize) -> (&[f32], f32) {
        let start = index * self.window_size;
        (
            &self.inputs[start..start + self.window_size],
            self.targets[index],
        )
    }

    /// Chronological split: the first `ratio` share of samples for training,
    /// the rest held out. No shuffling happens here.
    pub fn split(self, ratio: f64) -> (Self, Self) {
        let cut = ((self.len() as f64) * ratio.clamp(0.0, 1.0)) as usize;
        let window_size = self.window_size;
        let (train_in, holdout_in) = self.inputs.split_at(cut * window_size);
        let (train_tg, holdout_tg) = self.targets.split_at(cut);

        (
            Self {
                inputs: train_in.to_vec(),
                targets: train_tg.to_vec(),
                window_size,
            },
            Self {
                inputs: holdout_in.to_vec(),
                targets: holdout_tg.to_vec(),
                window_size,
            },
        )
    }
}
