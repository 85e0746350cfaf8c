//! Model evaluation
//!
//! Threshold-swept confusion-matrix statistics, ROC points and trapezoidal
//! AUC for the binary classifier, plus per-symbol accuracy rollups for the
//! multi-symbol direction models.

mod per_entity;
mod roc;

pub use per_entity::{per_symbol_accuracy, SymbolAccuracy};
pub use roc::{compute_auc, compute_roc, metrics_at_threshold, RocPoint, ThresholdMetrics};
