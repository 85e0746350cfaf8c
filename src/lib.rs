//! # ML Pipeline - CSV-to-classifier data pipelines
//!
//! This library covers the full data path of two small classification
//! pipelines that share a shape:
//!
//! - `ingest` - CSV parsing into named rows, with column-alias resolution
//! - `tabular` - imputation + fixed-order feature/label encoding for the
//!   passenger survival classifier, plus prediction CSV artifacts
//! - `series` - per-symbol normalization and sliding-window sequence/label
//!   construction for multi-symbol price-direction prediction
//! - `model` - a trainable model adapter with per-epoch progress reporting
//!   and cancellation
//! - `eval` - ROC/AUC, threshold metrics and per-symbol accuracy rollups
//!
//! Every stage consumes one immutable input and produces one new owned
//! output; errors are structured (`PipelineError`) and nothing is silently
//! swallowed except counted per-row skips during ingest.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use ml_pipeline::ingest::parse_csv_file;
//! use ml_pipeline::model::{flatten_sequences, ModelAdapter, ModelConfig, TrainControl};
//! use ml_pipeline::series::{build_sequences, PriceTable, SequenceConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let parsed = parse_csv_file("prices.csv")?;
//!     let table = PriceTable::from_csv(&parsed)?;
//!     let data = build_sequences(&table, &SequenceConfig::new(10, 2))?;
//!
//!     let x_train = flatten_sequences(&data.x_train)?;
//!     let x_test = flatten_sequences(&data.x_test)?;
//!
//!     let config = ModelConfig::new(x_train.ncols(), data.y_train.ncols());
//!     let mut adapter = ModelAdapter::new(config);
//!     adapter.build();
//!     adapter.train(&x_train, &data.y_train, &x_test, &data.y_test, &mut |p| {
//!         println!("epoch {}: loss {:.4}", p.epoch + 1, p.loss);
//!         TrainControl::Continue
//!     })?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod eval;
pub mod ingest;
pub mod model;
pub mod series;
pub mod tabular;

pub use error::{PipelineError, Result};
pub use eval::{compute_auc, compute_roc, metrics_at_threshold, per_symbol_accuracy};
pub use ingest::{parse_csv, AliasTable, ParsedCsv, Row};
pub use model::{ModelAdapter, ModelConfig, TrainControl};
pub use series::{build_sequences, PriceTable, SequenceConfig, SequenceDataset};
pub use tabular::{encode_dataset, EncodeMode, ImputationStats, TabularConfig, TabularDataset};
