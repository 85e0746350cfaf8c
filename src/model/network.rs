//! Feed-forward network with sigmoid outputs
//!
//! ReLU hidden layers, a sigmoid output layer and binary cross-entropy,
//! trained by mini-batch gradient descent with closed-form layer gradients.
//! There is no autodiff graph and no optimizer framework here; the network
//! exists so the adapter has something concrete to fit.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::PredictiveModel;
use crate::error::{PipelineError, Result};

const BCE_EPSILON: f64 = 1e-15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum Activation {
    ReLU,
    Sigmoid,
}

impl Activation {
    fn forward(&self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::ReLU => z.mapv(|v| v.max(0.0)),
            Activation::Sigmoid => z.mapv(|v| 1.0 / (1.0 + (-v).exp())),
        }
    }

    fn derivative(&self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Activation::ReLU => z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Sigmoid => z.mapv(|v| {
                let s = 1.0 / (1.0 + (-v).exp());
                s * (1.0 - s)
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Layer {
    /// (input_size x output_size)
    weights: Array2<f64>,
    biases: Array1<f64>,
    activation: Activation,
}

impl Layer {
    fn new(input_size: usize, output_size: usize, activation: Activation) -> Self {
        // Xavier/Glorot initialization
        let limit = (6.0 / (input_size + output_size) as f64).sqrt();
        Self {
            weights: Array2::random((input_size, output_size), Uniform::new(-limit, limit)),
            biases: Array1::zeros(output_size),
            activation,
        }
    }

    fn linear(&self, input: &Array2<f64>) -> Array2<f64> {
        let mut z = input.dot(&self.weights);
        for mut row in z.rows_mut() {
            row += &self.biases;
        }
        z
    }
}

/// Feed-forward network: ReLU hidden layers, sigmoid output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseNetwork {
    layers: Vec<Layer>,
    learning_rate: f64,
}

impl DenseNetwork {
    /// Build a network with layer sizes `input -> hidden... -> output`
    pub fn new(input_size: usize, hidden: &[usize], output_size: usize, learning_rate: f64) -> Self {
        let mut sizes = vec![input_size];
        sizes.extend_from_slice(hidden);
        sizes.push(output_size);

        let mut layers = Vec::with_capacity(sizes.len() - 1);
        for i in 0..sizes.len() - 1 {
            let activation = if i == sizes.len() - 2 {
                Activation::Sigmoid
            } else {
                Activation::ReLU
            };
            layers.push(Layer::new(sizes[i], sizes[i + 1], activation));
        }

        Self {
            layers,
            learning_rate,
        }
    }

    /// Forward pass keeping pre-activations and activations for backprop
    fn forward_cached(&self, input: &Array2<f64>) -> (Vec<Array2<f64>>, Vec<Array2<f64>>) {
        let mut zs = Vec::with_capacity(self.layers.len());
        let mut activations = vec![input.clone()];

        for layer in &self.layers {
            let z = layer.linear(activations.last().expect("non-empty activations"));
            activations.push(layer.activation.forward(&z));
            zs.push(z);
        }
        (zs, activations)
    }

    /// One gradient-descent step on a mini-batch; returns the batch loss
    fn fit_batch(&mut self, x: &Array2<f64>, y: &Array2<f64>) -> f64 {
        let (zs, activations) = self.forward_cached(x);
        let output = activations.last().expect("output activation");
        let loss = binary_cross_entropy(output, y);
        let n = x.nrows() as f64;

        // sigmoid + BCE collapse to (p - y)/n at the output
        let mut delta = (output - y) / n;

        for idx in (0..self.layers.len()).rev() {
            let weight_grad = activations[idx].t().dot(&delta);
            let bias_grad = delta.sum_axis(Axis(0));

            if idx > 0 {
                delta = delta.dot(&self.layers[idx].weights.t())
                    * self.layers[idx - 1].activation.derivative(&zs[idx - 1]);
            }

            let layer = &mut self.layers[idx];
            layer.weights = &layer.weights - &(self.learning_rate * &weight_grad);
            layer.biases = &layer.biases - &(self.learning_rate * &bias_grad);
        }

        loss
    }

    /// Save trained parameters as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load parameters saved by [`DenseNetwork::save`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let network = serde_json::from_reader(BufReader::new(file))?;
        Ok(network)
    }
}

impl PredictiveModel for DenseNetwork {
    fn train_epoch(&mut self, x: &Array2<f64>, y: &Array2<f64>, batch_size: usize) -> Result<f64> {
        let n_samples = x.nrows();
        if n_samples == 0 || batch_size == 0 {
            return Err(PipelineError::TrainingFailure(
                "empty batch or empty training set".into(),
            ));
        }
        if y.nrows() != n_samples {
            return Err(PipelineError::TrainingFailure(format!(
                "{} feature rows but {} label rows",
                n_samples,
                y.nrows()
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(&mut rand::thread_rng());

        let n_batches = (n_samples + batch_size - 1) / batch_size;
        let mut total_loss = 0.0;

        for batch in 0..n_batches {
            let start = batch * batch_size;
            let end = (start + batch_size).min(n_samples);
            let batch_indices = &indices[start..end];

            let x_batch = x.select(Axis(0), batch_indices);
            let y_batch = y.select(Axis(0), batch_indices);
            total_loss += self.fit_batch(&x_batch, &y_batch);
        }

        Ok(total_loss / n_batches as f64)
    }

    fn loss(&self, x: &Array2<f64>, y: &Array2<f64>) -> f64 {
        binary_cross_entropy(&self.predict(x), y)
    }

    fn predict(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut output = x.clone();
        for layer in &self.layers {
            output = layer.activation.forward(&layer.linear(&output));
        }
        output
    }

    fn num_parameters(&self) -> usize {
        self.layers
            .iter()
            .map(|l| l.weights.len() + l.biases.len())
            .sum()
    }
}

/// Mean binary cross-entropy over every output unit
fn binary_cross_entropy(predictions: &Array2<f64>, targets: &Array2<f64>) -> f64 {
    let n = predictions.len() as f64;
    let p = predictions.mapv(|v| v.clamp(BCE_EPSILON, 1.0 - BCE_EPSILON));
    let loss = targets * &p.mapv(f64::ln) + &(1.0 - targets) * &(1.0 - &p).mapv(f64::ln);
    -loss.sum() / n
}
