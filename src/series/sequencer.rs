//! Sliding-window sequence/label construction with walk-forward split

use chrono::NaiveDate;
use ndarray::{s, Array2, Array3};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::normalizer::normalize;
use super::types::PriceTable;
use crate::error::{PipelineError, Result};

/// Windowing parameters, all named and overridable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Historical timesteps per input sequence
    pub window: usize,
    /// Future timesteps each sample predicts
    pub horizon: usize,
    /// Chronological prefix fraction used for training
    pub train_fraction: f64,
    /// Cap on the number of generated samples
    pub max_samples: Option<usize>,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            window: 10,
            horizon: 2,
            train_fraction: 0.8,
            max_samples: Some(1000),
        }
    }
}

impl SequenceConfig {
    pub fn new(window: usize, horizon: usize) -> Self {
        Self {
            window,
            horizon,
            ..Self::default()
        }
    }

    pub fn with_train_fraction(mut self, fraction: f64) -> Self {
        self.train_fraction = fraction;
        self
    }

    pub fn with_max_samples(mut self, cap: Option<usize>) -> Self {
        self.max_samples = cap;
        self
    }
}

/// Windowed tensors split chronologically into train and test parts.
///
/// Shapes: `x_*` is `[samples, window, symbols * 2]` (normalized open/close
/// pairs concatenated in symbol order), `y_*` is `[samples, symbols * horizon]`
/// with slot `symbol_index * horizon + (offset - 1)`.
#[derive(Debug, Clone)]
pub struct SequenceDataset {
    pub x_train: Array3<f64>,
    pub y_train: Array2<f64>,
    pub x_test: Array3<f64>,
    pub y_test: Array2<f64>,
    /// Tracked symbols; defines the fixed order used in features and labels
    pub symbols: Vec<String>,
    /// Anchor dates of the test-set samples
    pub test_dates: Vec<NaiveDate>,
}

impl SequenceDataset {
    /// Label slot for one symbol and one forward offset (1-based)
    pub fn label_slot(&self, symbol_index: usize, offset: usize) -> usize {
        symbol_index * self.horizon() + (offset - 1)
    }

    pub fn horizon(&self) -> usize {
        self.y_train.ncols() / self.symbols.len().max(1)
    }
}

/// Build windowed sequences and forward-looking binary labels.
///
/// For each anchor index `i` (from `window` to `dates - horizon`,
/// exclusive), the features are the `window` normalized (open, close) pairs
/// at the dates immediately preceding the anchor, and each label tests
/// whether a symbol's raw close at `i + offset` strictly exceeds its raw
/// close at `i`. A sample is discarded whole when any symbol lacks data at
/// any history date, at the anchor, or at any future date; no partial fill
/// and no forward fill, ever.
pub fn build_sequences(table: &PriceTable, config: &SequenceConfig) -> Result<SequenceDataset> {
    if config.window == 0 || config.horizon == 0 {
        return Err(PipelineError::MalformedInput(
            "window and horizon must be positive".into(),
        ));
    }

    let normalized = normalize(table);
    let symbols = table.symbols().to_vec();
    let dates = table.dates();
    let n_features = symbols.len() * 2;
    let label_width = symbols.len() * config.horizon;

    let mut features_flat: Vec<f64> = Vec::new();
    let mut labels_flat: Vec<f64> = Vec::new();
    let mut anchor_dates: Vec<NaiveDate> = Vec::new();

    let last_anchor = dates.len().saturating_sub(config.horizon);
    'anchors: for i in config.window..last_anchor {
        if let Some(cap) = config.max_samples {
            if anchor_dates.len() >= cap {
                break;
            }
        }

        // validity first: every symbol must have every history date, the
        // anchor, and every future date, or the sample is thrown away whole
        for symbol in &symbols {
            for t in 0..config.window {
                if normalized.point(symbol, dates[i - config.window + t]).is_none() {
                    continue 'anchors;
                }
            }
            for offset in 0..=config.horizon {
                if table.point(symbol, dates[i + offset]).is_none() {
                    continue 'anchors;
                }
            }
        }

        for t in 0..config.window {
            let date = dates[i - config.window + t];
            for symbol in &symbols {
                let p = normalized
                    .point(symbol, date)
                    .ok_or_else(|| PipelineError::MalformedInput("validated point vanished".into()))?;
                features_flat.push(p.open);
                features_flat.push(p.close);
            }
        }

        let mut sample_labels = vec![0.0; label_width];
        for (sym_idx, symbol) in symbols.iter().enumerate() {
            let base = table
                .close(symbol, dates[i])
                .ok_or_else(|| PipelineError::MalformedInput("validated point vanished".into()))?;
            for offset in 1..=config.horizon {
                let future = table
                    .close(symbol, dates[i + offset])
                    .ok_or_else(|| PipelineError::MalformedInput("validated point vanished".into()))?;
                sample_labels[sym_idx * config.horizon + (offset - 1)] =
                    if future > base { 1.0 } else { 0.0 };
            }
        }
        labels_flat.extend(sample_labels);
        anchor_dates.push(dates[i]);
    }

    let n_samples = anchor_dates.len();
    if n_samples == 0 {
        return Err(PipelineError::DataInsufficiency(
            "no valid sequences survived windowing".into(),
        ));
    }

    let x = Array3::from_shape_vec((n_samples, config.window, n_features), features_flat)
        .map_err(|e| PipelineError::MalformedInput(format!("sequence tensor shape: {e}")))?;
    let y = Array2::from_shape_vec((n_samples, label_width), labels_flat)
        .map_err(|e| PipelineError::MalformedInput(format!("label tensor shape: {e}")))?;

    // chronological prefix/suffix cut, no shuffling
    let split = (n_samples as f64 * config.train_fraction).floor() as usize;

    let dataset = SequenceDataset {
        x_train: x.slice(s![..split, .., ..]).to_owned(),
        y_train: y.slice(s![..split, ..]).to_owned(),
        x_test: x.slice(s![split.., .., ..]).to_owned(),
        y_test: y.slice(s![split.., ..]).to_owned(),
        symbols,
        test_dates: anchor_dates[split..].to_vec(),
    };

    info!(
        samples = n_samples,
        train = split,
        test = n_samples - split,
        window = config.window,
        horizon = config.horizon,
        "built sequence dataset"
    );

    Ok(dataset)
}
