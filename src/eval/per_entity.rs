//! Per-symbol accuracy rollups for multi-label direction predictions

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// One symbol's rollup over the test set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolAccuracy {
    pub symbol: String,
    /// Exact match rate of thresholded predictions, 0 with no tallied slots
    pub accuracy: f64,
    /// Per-slot correctness in (sample, offset) iteration order; feeds the
    /// timeline visualization downstream
    pub outcomes: Vec<bool>,
}

/// Score each symbol's slice of the label matrix.
///
/// Uses the same slot arithmetic as the sequence builder:
/// `symbol_index * horizon + day_offset`. Predictions are thresholded at
/// 0.5; slots beyond the matrix width are skipped, matching samples whose
/// label vector is narrower than expected.
pub fn per_symbol_accuracy(
    predictions: &Array2<f64>,
    y_true: &Array2<f64>,
    symbols: &[String],
    horizon: usize,
) -> Result<Vec<SymbolAccuracy>> {
    if predictions.dim() != y_true.dim() {
        return Err(PipelineError::MalformedInput(format!(
            "prediction shape {:?} does not match label shape {:?}",
            predictions.dim(),
            y_true.dim()
        )));
    }
    if horizon == 0 {
        return Err(PipelineError::MalformedInput(
            "horizon must be positive".into(),
        ));
    }

    let width = y_true.ncols();
    let mut rollups = Vec::with_capacity(symbols.len());

    for (sym_idx, symbol) in symbols.iter().enumerate() {
        let mut correct = 0usize;
        let mut outcomes = Vec::new();

        for sample in 0..y_true.nrows() {
            for offset in 0..horizon {
                let slot = sym_idx * horizon + offset;
                if slot >= width {
                    continue;
                }
                let truth = y_true[[sample, slot]];
                let predicted = if predictions[[sample, slot]] >= 0.5 {
                    1.0
                } else {
                    0.0
                };
                let hit = (truth - predicted).abs() < 1e-10;
                if hit {
                    correct += 1;
                }
                outcomes.push(hit);
            }
        }

        let accuracy = if outcomes.is_empty() {
            0.0
        } else {
            correct as f64 / outcomes.len() as f64
        };
        rollups.push(SymbolAccuracy {
            symbol: symbol.clone(),
            accuracy,
            outcomes,
        });
    }

    Ok(rollups)
}
