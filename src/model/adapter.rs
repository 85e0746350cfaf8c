//! The build / train / predict / dispose wrapper

use ndarray::Array2;
use tracing::{debug, info};

use super::config::ModelConfig;
use super::PredictiveModel;
use crate::error::{PipelineError, Result};

/// Per-epoch progress snapshot delivered through the training callback
#[derive(Debug, Clone, Copy)]
pub struct EpochProgress {
    /// Zero-based epoch index
    pub epoch: usize,
    /// Total epoch count of the run
    pub epochs: usize,
    pub loss: f64,
    pub accuracy: f64,
    pub val_loss: f64,
    pub val_accuracy: f64,
}

/// The callback's verdict after each epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainControl {
    Continue,
    /// Cancel the run; completed epochs are kept
    Stop,
}

/// Record of one training run
#[derive(Debug, Clone)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochProgress>,
    /// True when the callback cancelled before the configured epoch count
    pub stopped_early: bool,
}

/// Thin wrapper owning a polymorphic predictive model.
///
/// The adapter does not split data: train takes the validation set the
/// caller produced. A failed epoch propagates its error and leaves the
/// adapter re-trainable; [`ModelAdapter::dispose`] releases the model
/// buffers and returns to the idle, re-buildable state.
pub struct ModelAdapter {
    config: ModelConfig,
    model: Option<Box<dyn PredictiveModel>>,
}

impl ModelAdapter {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn is_built(&self) -> bool {
        self.model.is_some()
    }

    /// Instantiate the configured model, replacing any previous one
    pub fn build(&mut self) {
        let model = self.config.build_model();
        info!(parameters = model.num_parameters(), "built model");
        self.model = Some(model);
    }

    /// Fit the model, reporting progress once per epoch.
    ///
    /// The callback is the run's suspension point: it receives every epoch's
    /// training and validation loss/accuracy and may return
    /// [`TrainControl::Stop`] to cancel the remainder of the run.
    pub fn train(
        &mut self,
        x: &Array2<f64>,
        y: &Array2<f64>,
        x_val: &Array2<f64>,
        y_val: &Array2<f64>,
        on_epoch: &mut dyn FnMut(&EpochProgress) -> TrainControl,
    ) -> Result<TrainingHistory> {
        if x.nrows() != y.nrows() || x_val.nrows() != y_val.nrows() {
            return Err(PipelineError::MalformedInput(format!(
                "feature/label row mismatch: train {}/{}, validation {}/{}",
                x.nrows(),
                y.nrows(),
                x_val.nrows(),
                y_val.nrows()
            )));
        }
        if x.nrows() == 0 {
            return Err(PipelineError::DataInsufficiency(
                "cannot train on zero samples".into(),
            ));
        }
        // an empty validation set would make every reported val_loss NaN
        if x_val.nrows() == 0 {
            return Err(PipelineError::DataInsufficiency(
                "cannot validate on zero samples".into(),
            ));
        }
        let model = self.model.as_mut().ok_or_else(|| {
            PipelineError::MissingPrerequisite("train called before build".into())
        })?;

        let mut history = Vec::with_capacity(self.config.epochs);
        let mut stopped_early = false;

        for epoch in 0..self.config.epochs {
            let loss = model.train_epoch(x, y, self.config.batch_size)?;

            let progress = EpochProgress {
                epoch,
                epochs: self.config.epochs,
                loss,
                accuracy: accuracy(&model.predict(x), y),
                val_loss: model.loss(x_val, y_val),
                val_accuracy: accuracy(&model.predict(x_val), y_val),
            };
            debug!(
                epoch = progress.epoch,
                loss = progress.loss,
                val_loss = progress.val_loss,
                "epoch finished"
            );
            let control = on_epoch(&progress);
            history.push(progress);

            if control == TrainControl::Stop {
                info!(epoch, "training cancelled by caller");
                stopped_early = true;
                break;
            }
        }

        Ok(TrainingHistory {
            epochs: history,
            stopped_early,
        })
    }

    /// Probability matrix for a batch of inputs
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let model = self.model.as_ref().ok_or_else(|| {
            PipelineError::MissingPrerequisite("predict called before build".into())
        })?;
        Ok(model.predict(x))
    }

    /// Release the model's buffers; the adapter can be built again
    pub fn dispose(&mut self) {
        self.model = None;
    }
}

/// Mean exact-match rate of predictions thresholded at 0.5
fn accuracy(predictions: &Array2<f64>, targets: &Array2<f64>) -> f64 {
    let total = predictions.len();
    if total == 0 {
        return 0.0;
    }
    let correct = predictions
        .iter()
        .zip(targets.iter())
        .filter(|(p, t)| {
            let class = if **p >= 0.5 { 1.0 } else { 0.0 };
            (class - **t).abs() < 1e-10
        })
        .count();
    correct as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy_data() -> (Array2<f64>, Array2<f64>) {
        let x = array![
            [1.0, 0.0],
            [0.8, 0.1],
            [0.9, 0.2],
            [0.0, 1.0],
            [0.1, 0.8],
            [0.2, 0.9],
        ];
        let y = array![[1.0], [1.0], [1.0], [0.0], [0.0], [0.0]];
        (x, y)
    }

    #[test]
    fn test_predict_before_build_fails() {
        let adapter = ModelAdapter::new(ModelConfig::new(2, 1));
        let (x, _) = toy_data();

        let err = adapter.predict(&x).unwrap_err();
        assert!(matches!(err, PipelineError::MissingPrerequisite(_)));
    }

    #[test]
    fn test_train_before_build_fails() {
        let mut adapter = ModelAdapter::new(ModelConfig::new(2, 1));
        let (x, y) = toy_data();

        let err = adapter
            .train(&x, &y, &x, &y, &mut |_| TrainControl::Continue)
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingPrerequisite(_)));
    }

    #[test]
    fn test_progress_reported_every_epoch() {
        let (x, y) = toy_data();
        let mut adapter = ModelAdapter::new(ModelConfig::new(2, 1).with_epochs(7));
        adapter.build();

        let mut seen = Vec::new();
        let history = adapter
            .train(&x, &y, &x, &y, &mut |p| {
                seen.push(p.epoch);
                TrainControl::Continue
            })
            .unwrap();

        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(history.epochs.len(), 7);
        assert!(!history.stopped_early);
    }

    #[test]
    fn test_cancellation_stops_run() {
        let (x, y) = toy_data();
        let mut adapter = ModelAdapter::new(ModelConfig::new(2, 1).with_epochs(50));
        adapter.build();

        let history = adapter
            .train(&x, &y, &x, &y, &mut |p| {
                if p.epoch >= 2 {
                    TrainControl::Stop
                } else {
                    TrainControl::Continue
                }
            })
            .unwrap();

        assert_eq!(history.epochs.len(), 3);
        assert!(history.stopped_early);
    }

    #[test]
    fn test_dispose_returns_to_idle() {
        let mut adapter = ModelAdapter::new(ModelConfig::new(2, 1).with_epochs(1));
        adapter.build();
        assert!(adapter.is_built());

        adapter.dispose();
        assert!(!adapter.is_built());

        // re-buildable after dispose
        adapter.build();
        let (x, y) = toy_data();
        adapter
            .train(&x, &y, &x, &y, &mut |_| TrainControl::Continue)
            .unwrap();
    }

    #[test]
    fn test_zero_samples_rejected() {
        let mut adapter = ModelAdapter::new(ModelConfig::new(2, 1));
        adapter.build();
        let empty = Array2::<f64>::zeros((0, 2));
        let empty_y = Array2::<f64>::zeros((0, 1));

        let err = adapter
            .train(&empty, &empty_y, &empty, &empty_y, &mut |_| {
                TrainControl::Continue
            })
            .unwrap_err();
        assert!(matches!(err, PipelineError::DataInsufficiency(_)));
    }

    #[test]
    fn test_empty_validation_set_rejected() {
        let mut adapter = ModelAdapter::new(ModelConfig::new(2, 1));
        adapter.build();
        let (x, y) = toy_data();
        let empty = Array2::<f64>::zeros((0, 2));
        let empty_y = Array2::<f64>::zeros((0, 1));

        let err = adapter
            .train(&x, &y, &empty, &empty_y, &mut |_| TrainControl::Continue)
            .unwrap_err();
        assert!(matches!(err, PipelineError::DataInsufficiency(_)));
    }

    #[test]
    fn test_accuracy_helper() {
        let preds = array![[0.9], [0.2], [0.6], [0.4]];
        let truth = array![[1.0], [0.0], [0.0], [0.0]];
        assert!((accuracy(&preds, &truth) - 0.75).abs() < 1e-10);
    }
}
