//! Prediction artifact writers

use std::io::Write;

use crate::error::{PipelineError, Result};

/// Write the binary-prediction artifact: `PassengerId,Survived`
pub fn write_predictions<W: Write>(writer: W, ids: &[String], predictions: &[u8]) -> Result<()> {
    if ids.len() != predictions.len() {
        return Err(PipelineError::MalformedInput(format!(
            "{} ids but {} predictions",
            ids.len(),
            predictions.len()
        )));
    }

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["PassengerId", "Survived"])?;
    for (id, pred) in ids.iter().zip(predictions) {
        csv.write_record([id.as_str(), &pred.to_string()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write the probability artifact: `PassengerId,Probability`, 4 decimal places
pub fn write_probabilities<W: Write>(writer: W, ids: &[String], probabilities: &[f64]) -> Result<()> {
    if ids.len() != probabilities.len() {
        return Err(PipelineError::MalformedInput(format!(
            "{} ids but {} probabilities",
            ids.len(),
            probabilities.len()
        )));
    }

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["PassengerId", "Probability"])?;
    for (id, prob) in ids.iter().zip(probabilities) {
        csv.write_record([id.as_str(), &format!("{prob:.4}")])?;
    }
    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (1..=n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_prediction_artifact() {
        let mut out = Vec::new();
        write_predictions(&mut out, &ids(3), &[1, 0, 1]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "PassengerId,Survived\n1,1\n2,0\n3,1\n");
    }

    #[test]
    fn test_probability_artifact_rounds_to_four_places() {
        let mut out = Vec::new();
        write_probabilities(&mut out, &ids(2), &[0.123456, 0.9]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "PassengerId,Probability\n1,0.1235\n2,0.9000\n");
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut out = Vec::new();
        assert!(write_predictions(&mut out, &ids(2), &[1]).is_err());
    }
}
