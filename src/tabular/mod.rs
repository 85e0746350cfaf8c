//! Tabular feature/label builder for the passenger survival dataset
//!
//! Turns ingested rows into fixed-order numeric feature vectors with an
//! aligned label vector:
//! - Imputation statistics (medians, mode) are fitted on training rows only
//!   and threaded into inference-mode encoding as parameters, never
//!   recomputed, so both encodings agree and nothing leaks.
//! - Encoding order is fixed and reported via `feature_names`.
//! - Prediction artifacts (label and probability CSVs) are written here too.

mod builder;
mod explore;
mod export;
mod stats;

pub use builder::{encode_dataset, EncodeMode, TabularConfig, TabularDataset};
pub use explore::survival_rates_by;
pub use export::{write_predictions, write_probabilities};
pub use stats::ImputationStats;
