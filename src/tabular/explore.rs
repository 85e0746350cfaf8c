//! Data-exploration rollups
//!
//! Survival-rate summaries for the overview charts; this module computes the
//! numbers, rendering is the presentation layer's concern.

use crate::error::{PipelineError, Result};
use crate::ingest::{AliasTable, ParsedCsv};

/// Survival rate (percent) grouped by the values of one canonical column.
///
/// Groups appear in first-encountered order; rows without a value in the
/// grouping column or without a parsable label are left out of the tally.
pub fn survival_rates_by(parsed: &ParsedCsv, canonical: &str) -> Result<Vec<(String, f64)>> {
    let cols = AliasTable::survival().resolve(&parsed.headers);
    cols.require("Survived")?;
    if cols.header(canonical).is_none() {
        return Err(PipelineError::MalformedInput(format!(
            "unknown grouping column: {canonical}"
        )));
    }

    let mut groups: Vec<(String, usize, usize)> = Vec::new(); // (value, survived, total)
    for row in &parsed.rows {
        let (Some(value), Some(label)) = (
            cols.non_empty(row, canonical),
            cols.non_empty(row, "Survived")
                .and_then(|v| v.parse::<i64>().ok()),
        ) else {
            continue;
        };

        match groups.iter_mut().find(|(v, _, _)| v == value) {
            Some((_, survived, total)) => {
                *total += 1;
                if label == 1 {
                    *survived += 1;
                }
            }
            None => groups.push((value.to_string(), (label == 1) as usize, 1)),
        }
    }

    Ok(groups
        .into_iter()
        .map(|(value, survived, total)| (value, survived as f64 / total as f64 * 100.0))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_csv;

    #[test]
    fn test_rates_by_sex() {
        let text = "Survived,Sex\n1,female\n1,female\n0,female\n0,male\n1,male\n";
        let parsed = parse_csv(text).unwrap();
        let rates = survival_rates_by(&parsed, "Sex").unwrap();

        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].0, "female");
        assert!((rates[0].1 - 200.0 / 3.0).abs() < 1e-10);
        assert!((rates[1].1 - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_unlabeled_rows_skipped() {
        let text = "Survived,Pclass\n1,1\n,1\n0,2\n";
        let parsed = parse_csv(text).unwrap();
        let rates = survival_rates_by(&parsed, "Pclass").unwrap();

        assert!((rates[0].1 - 100.0).abs() < 1e-10);
        assert!((rates[1].1 - 0.0).abs() < 1e-10);
    }

    #[test]
    fn test_missing_label_column() {
        let parsed = parse_csv("Sex\nmale\n").unwrap();
        assert!(survival_rates_by(&parsed, "Sex").is_err());
    }
}
