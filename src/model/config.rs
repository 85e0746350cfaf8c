//! Model configuration

use serde::{Deserialize, Serialize};

use super::network::DenseNetwork;
use super::PredictiveModel;

/// Architecture selector.
///
/// Layer shapes are tuning parameters; the pipeline only relies on the
/// fit/predict contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Architecture {
    /// Feed-forward: ReLU hidden layers, sigmoid output
    Dense { hidden: Vec<usize> },
}

/// Configuration for the trainable model adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Input feature count
    pub input_size: usize,
    /// Output unit count (one sigmoid probability per unit)
    pub output_size: usize,
    pub architecture: Architecture,
    pub learning_rate: f64,
    pub epochs: usize,
    pub batch_size: usize,
}

impl ModelConfig {
    /// Defaults matching the dense survival classifier: one hidden layer of
    /// 16 units, 50 epochs, batches of 32
    pub fn new(input_size: usize, output_size: usize) -> Self {
        Self {
            input_size,
            output_size,
            architecture: Architecture::Dense { hidden: vec![16] },
            learning_rate: 0.01,
            epochs: 50,
            batch_size: 32,
        }
    }

    pub fn with_hidden(mut self, hidden: &[usize]) -> Self {
        self.architecture = Architecture::Dense {
            hidden: hidden.to_vec(),
        };
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Instantiate the configured model
    pub fn build_model(&self) -> Box<dyn PredictiveModel> {
        match &self.architecture {
            Architecture::Dense { hidden } => Box::new(DenseNetwork::new(
                self.input_size,
                hidden,
                self.output_size,
                self.learning_rate,
            )),
        }
    }
}
