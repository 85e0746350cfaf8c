//! Imputation statistics fitted on training data

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ingest::{AliasTable, ParsedCsv};

/// Statistics used to fill missing values during encoding.
///
/// Fitted from training rows only and passed into every encoding call,
/// training and inference alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationStats {
    /// Median passenger age over training rows with a parsable age
    pub age_median: f64,
    /// Median fare over training rows with a parsable fare
    pub fare_median: f64,
    /// Most frequent non-empty boarding port, ties broken by first
    /// occurrence; always one of C, Q or S
    pub embarked_mode: String,
}

impl Default for ImputationStats {
    /// Fallbacks used when a column has no usable training values at all
    fn default() -> Self {
        Self {
            age_median: 28.0,
            fare_median: 14.45,
            embarked_mode: "S".to_string(),
        }
    }
}

impl ImputationStats {
    /// Fit statistics from training rows.
    ///
    /// The median is interpolated: for an even number of values it is the
    /// mean of the two central order statistics.
    pub fn fit(parsed: &ParsedCsv) -> Self {
        let cols = AliasTable::survival().resolve(&parsed.headers);
        let defaults = Self::default();

        let ages: Vec<f64> = parsed
            .rows
            .iter()
            .filter_map(|r| cols.parse_f64(r, "Age"))
            .collect();
        let fares: Vec<f64> = parsed
            .rows
            .iter()
            .filter_map(|r| cols.parse_f64(r, "Fare"))
            .collect();

        // mode with first-encountered tie-breaking, so a Vec instead of a map
        let mut port_counts: Vec<(String, usize)> = Vec::new();
        for row in &parsed.rows {
            if let Some(port) = cols.non_empty(row, "Embarked") {
                match port_counts.iter_mut().find(|(p, _)| p == port) {
                    Some((_, n)) => *n += 1,
                    None => port_counts.push((port.to_string(), 1)),
                }
            }
        }
        // a later candidate only wins with a strictly greater count
        let embarked_mode = port_counts
            .iter()
            .fold(None::<&(String, usize)>, |best, cur| match best {
                Some(b) if cur.1 <= b.1 => best,
                _ => Some(cur),
            })
            .map(|(p, _)| p.clone())
            // encoding one-hots over C/Q/S only, so a junk-valued mode
            // cannot be allowed through
            .filter(|p| matches!(p.as_str(), "C" | "Q" | "S"))
            .unwrap_or(defaults.embarked_mode);

        let stats = Self {
            age_median: median(&ages).unwrap_or(defaults.age_median),
            fare_median: median(&fares).unwrap_or(defaults.fare_median),
            embarked_mode,
        };
        debug!(
            age_median = stats.age_median,
            fare_median = stats.fare_median,
            embarked_mode = %stats.embarked_mode,
            "fitted imputation statistics"
        );
        stats
    }
}

/// Interpolated median of a slice, `None` when empty
fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_csv;

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_fit_from_rows() {
        let text = "Age,Fare,Embarked\n20,10,S\n30,20,C\n40,30,S\n,,\n";
        let parsed = parse_csv(text).unwrap();
        let stats = ImputationStats::fit(&parsed);

        assert!((stats.age_median - 30.0).abs() < 1e-10);
        assert!((stats.fare_median - 20.0).abs() < 1e-10);
        assert_eq!(stats.embarked_mode, "S");
    }

    #[test]
    fn test_mode_tie_breaks_first_encountered() {
        let text = "Age,Fare,Embarked\n1,1,Q\n2,2,C\n3,3,Q\n4,4,C\n";
        let parsed = parse_csv(text).unwrap();
        let stats = ImputationStats::fit(&parsed);
        assert_eq!(stats.embarked_mode, "Q");

        // same counts, opposite encounter order
        let text = "Age,Fare,Embarked\n1,1,C\n2,2,Q\n3,3,C\n4,4,Q\n";
        let parsed = parse_csv(text).unwrap();
        let stats = ImputationStats::fit(&parsed);
        assert_eq!(stats.embarked_mode, "C");
    }

    #[test]
    fn test_junk_mode_falls_back_to_known_port() {
        let text = "Age,Fare,Embarked\n1,1,X\n2,2,X\n3,3,X\n4,4,C\n";
        let parsed = parse_csv(text).unwrap();
        let stats = ImputationStats::fit(&parsed);

        assert_eq!(stats.embarked_mode, "S");
    }

    #[test]
    fn test_defaults_when_all_missing() {
        let text = "A,B\n1,2\n";
        let parsed = parse_csv(text).unwrap();
        let stats = ImputationStats::fit(&parsed);

        assert!((stats.age_median - 28.0).abs() < 1e-10);
        assert!((stats.fare_median - 14.45).abs() < 1e-10);
        assert_eq!(stats.embarked_mode, "S");
    }
}
