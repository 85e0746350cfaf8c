//! Trainable model adapter
//!
//! A thin wrapper that owns a predictive model, polymorphic over
//! architecture, behind build / train / predict / dispose. Training reports
//! per-epoch progress through a callback which can also cancel the run; the
//! validation split is supplied by the caller, never produced here.
//!
//! The concrete layer shapes are a tuning parameter, not part of the
//! pipeline contract; sequence tensors are fed through
//! [`flatten_sequences`].

mod adapter;
mod config;
mod network;

pub use adapter::{EpochProgress, ModelAdapter, TrainControl, TrainingHistory};
pub use config::{Architecture, ModelConfig};
pub use network::DenseNetwork;

use ndarray::{Array2, Array3};

use crate::error::{PipelineError, Result};

/// The seam the adapter trains and queries through
pub trait PredictiveModel {
    /// Run one epoch of fitting over shuffled mini-batches; returns the mean
    /// training loss across batches
    fn train_epoch(&mut self, x: &Array2<f64>, y: &Array2<f64>, batch_size: usize) -> Result<f64>;

    /// Loss of the current parameters on a dataset
    fn loss(&self, x: &Array2<f64>, y: &Array2<f64>) -> f64;

    /// Probability matrix for a batch of inputs
    fn predict(&self, x: &Array2<f64>) -> Array2<f64>;

    /// Total trainable parameter count
    fn num_parameters(&self) -> usize;
}

/// Flatten `[samples, window, features]` sequences into the
/// `[samples, window * features]` layout a feed-forward model consumes
pub fn flatten_sequences(x: &Array3<f64>) -> Result<Array2<f64>> {
    let (n, w, f) = x.dim();
    x.to_owned()
        .into_shape((n, w * f))
        .map_err(|e| PipelineError::MalformedInput(format!("sequence flatten: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_flatten_preserves_timestep_order() {
        let x = Array3::from_shape_fn((2, 3, 2), |(s, t, f)| (s * 100 + t * 10 + f) as f64);
        let flat = flatten_sequences(&x).unwrap();

        assert_eq!(flat.dim(), (2, 6));
        assert_eq!(flat[[0, 0]], 0.0);
        assert_eq!(flat[[0, 2]], 10.0);
        assert_eq!(flat[[1, 5]], 121.0);
    }
}
