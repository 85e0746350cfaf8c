//! ROC curve, AUC and threshold metrics

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Number of evenly spaced thresholds swept over [0, 1], inclusive
const ROC_THRESHOLDS: usize = 101;

/// Confusion-matrix tally at one decision threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RocPoint {
    pub threshold: f64,
    /// fp / (fp + tn), 0 when there are no actual negatives
    pub fpr: f64,
    /// tp / (tp + fn), 0 when there are no actual positives
    pub tpr: f64,
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_: usize,
}

/// Metrics derived from the ROC point nearest a requested threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdMetrics {
    pub threshold: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub accuracy: f64,
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_: usize,
}

/// Sweep 101 evenly spaced thresholds over [0, 1] and tally the confusion
/// matrix at each. A probability at or above the threshold counts as a
/// positive prediction; rates with a zero denominator are defined as 0.
pub fn compute_roc(y_true: &[f64], probabilities: &[f64]) -> Result<Vec<RocPoint>> {
    if y_true.len() != probabilities.len() {
        return Err(PipelineError::MalformedInput(format!(
            "{} labels but {} probabilities",
            y_true.len(),
            probabilities.len()
        )));
    }
    if y_true.is_empty() {
        return Err(PipelineError::DataInsufficiency(
            "cannot evaluate zero samples".into(),
        ));
    }

    let mut points = Vec::with_capacity(ROC_THRESHOLDS);
    for step in 0..ROC_THRESHOLDS {
        let threshold = step as f64 / (ROC_THRESHOLDS - 1) as f64;

        let (mut tp, mut fp, mut tn, mut fn_) = (0usize, 0usize, 0usize, 0usize);
        for (truth, prob) in y_true.iter().zip(probabilities) {
            let actual_positive = (truth - 1.0).abs() < 1e-10;
            let predicted_positive = *prob >= threshold;
            match (actual_positive, predicted_positive) {
                (true, true) => tp += 1,
                (false, true) => fp += 1,
                (false, false) => tn += 1,
                (true, false) => fn_ += 1,
            }
        }

        points.push(RocPoint {
            threshold,
            fpr: ratio(fp, fp + tn),
            tpr: ratio(tp, tp + fn_),
            tp,
            fp,
            tn,
            fn_,
        });
    }

    Ok(points)
}

/// Trapezoidal area under the ROC curve.
///
/// Threshold order does not guarantee ascending FPR, so the points are
/// sorted by (FPR, TPR) before integrating.
pub fn compute_auc(points: &[RocPoint]) -> f64 {
    let mut curve: Vec<(f64, f64)> = points.iter().map(|p| (p.fpr, p.tpr)).collect();
    curve.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut auc = 0.0;
    for pair in curve.windows(2) {
        let (prev_fpr, prev_tpr) = pair[0];
        let (fpr, tpr) = pair[1];
        auc += (fpr - prev_fpr) * (tpr + prev_tpr) / 2.0;
    }
    auc
}

/// Derive precision/recall/F1/accuracy from the ROC point whose threshold is
/// nearest the requested value. Every ratio with a zero denominator is 0.
pub fn metrics_at_threshold(points: &[RocPoint], threshold: f64) -> Result<ThresholdMetrics> {
    let point = points
        .iter()
        .min_by(|a, b| {
            let da = (a.threshold - threshold).abs();
            let db = (b.threshold - threshold).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .ok_or_else(|| {
            PipelineError::MissingPrerequisite("metrics requested before ROC computation".into())
        })?;

    let precision = ratio(point.tp, point.tp + point.fp);
    let recall = point.tpr;
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    let total = point.tp + point.fp + point.tn + point.fn_;
    let accuracy = ratio(point.tp + point.tn, total);

    Ok(ThresholdMetrics {
        threshold: point.threshold,
        precision,
        recall,
        f1,
        accuracy,
        tp: point.tp,
        fp: point.fp,
        tn: point.tn,
        fn_: point.fn_,
    })
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roc_has_101_ordered_points() {
        let points = compute_roc(&[1.0, 0.0], &[0.8, 0.3]).unwrap();

        assert_eq!(points.len(), 101);
        assert!((points[0].threshold - 0.0).abs() < 1e-10);
        assert!((points[50].threshold - 0.5).abs() < 1e-10);
        assert!((points[100].threshold - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_length_mismatch_and_empty_input() {
        assert!(matches!(
            compute_roc(&[1.0], &[0.5, 0.6]).unwrap_err(),
            PipelineError::MalformedInput(_)
        ));
        assert!(matches!(
            compute_roc(&[], &[]).unwrap_err(),
            PipelineError::DataInsufficiency(_)
        ));
    }

    #[test]
    fn test_perfect_separator_auc_is_one() {
        let labels = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        let probs = [1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        let points = compute_roc(&labels, &probs).unwrap();

        assert!((compute_auc(&points) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_auc_bounds_and_random_scores() {
        // alternating labels over an evenly spaced probability grid:
        // scores carry essentially no signal, AUC should sit near 0.5
        let n = 100;
        let labels: Vec<f64> = (0..n).map(|i| (i % 2) as f64).collect();
        let probs: Vec<f64> = (0..n).map(|i| i as f64 / n as f64).collect();
        let points = compute_roc(&labels, &probs).unwrap();
        let auc = compute_auc(&points);

        assert!((0.0..=1.0).contains(&auc));
        assert!((auc - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_recall_at_extreme_thresholds() {
        let labels = [1.0, 0.0, 1.0, 0.0];
        let probs = [0.7, 0.4, 0.6, 0.2];
        let points = compute_roc(&labels, &probs).unwrap();

        // threshold 0: everything predicted positive
        let low = metrics_at_threshold(&points, 0.0).unwrap();
        assert!((low.recall - 1.0).abs() < 1e-10);

        // threshold 1: nothing reaches it here
        let high = metrics_at_threshold(&points, 1.0).unwrap();
        assert!((high.recall - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_clean_split_scenario() {
        let labels = [1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let probs = [0.9, 0.1, 0.8, 0.2, 0.7, 0.3, 0.6, 0.4, 0.55, 0.45];
        let points = compute_roc(&labels, &probs).unwrap();
        let metrics = metrics_at_threshold(&points, 0.5).unwrap();

        assert_eq!(metrics.tp, 5);
        assert_eq!(metrics.fp, 0);
        assert_eq!(metrics.tn, 5);
        assert_eq!(metrics.fn_, 0);
        assert!((metrics.accuracy - 1.0).abs() < 1e-10);
        assert!((metrics.f1 - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_denominators_are_zero() {
        // all-positive ground truth: no negatives, so FPR must be 0 everywhere
        let points = compute_roc(&[1.0, 1.0], &[0.9, 0.8]).unwrap();
        assert!(points.iter().all(|p| p.fpr == 0.0));

        // at threshold 1.0 nothing is predicted positive: precision is 0
        let metrics = metrics_at_threshold(&points, 1.0).unwrap();
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.f1, 0.0);
    }

    #[test]
    fn test_metrics_on_empty_point_set() {
        assert!(matches!(
            metrics_at_threshold(&[], 0.5).unwrap_err(),
            PipelineError::MissingPrerequisite(_)
        ));
    }
}
