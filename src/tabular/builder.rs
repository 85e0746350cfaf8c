//! Fixed-order feature/label encoding

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::stats::ImputationStats;
use crate::error::{PipelineError, Result};
use crate::ingest::{AliasTable, ParsedCsv};

/// Whether labels are read and therefore required
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeMode {
    /// Rows carry a survival label; a row without one fails the whole call
    Training,
    /// No labels are read
    Inference,
}

/// Encoding parameters.
///
/// The scale constants are deliberately rough divisors, not learned standard
/// deviations; both are overridable named parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabularConfig {
    /// Divisor applied to the median-centered age
    pub age_scale: f64,
    /// Divisor applied to the median-centered fare
    pub fare_scale: f64,
    /// Append FamilySize and IsAlone derived features
    pub family_features: bool,
}

impl Default for TabularConfig {
    fn default() -> Self {
        Self {
            age_scale: 20.0,
            fare_scale: 30.0,
            family_features: false,
        }
    }
}

impl TabularConfig {
    pub fn with_family_features(mut self, enabled: bool) -> Self {
        self.family_features = enabled;
        self
    }
}

/// Encoded dataset: features with an aligned label vector and identifiers
#[derive(Debug, Clone)]
pub struct TabularDataset {
    /// Feature matrix (n_rows x n_features), row order preserved from input
    pub features: Array2<f64>,
    /// Label vector, present in training mode only
    pub labels: Option<Array1<f64>>,
    /// Passenger identifiers, parallel to the feature rows
    pub passenger_ids: Vec<String>,
    /// Feature names matching the encoding order
    pub feature_names: Vec<String>,
}

impl TabularDataset {
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }
}

/// Encode ingested rows into a [`TabularDataset`].
///
/// Fixed encoding order: Pclass one-hot (3), Sex binary, standardized Age,
/// SibSp, Parch, standardized Fare, Embarked one-hot (3), then the optional
/// family features. Missing numeric values are imputed with the threaded
/// medians before standardization.
pub fn encode_dataset(
    parsed: &ParsedCsv,
    mode: EncodeMode,
    stats: &ImputationStats,
    config: &TabularConfig,
) -> Result<TabularDataset> {
    if parsed.rows.is_empty() {
        return Err(PipelineError::DataInsufficiency(
            "no rows to encode".into(),
        ));
    }

    let cols = AliasTable::survival().resolve(&parsed.headers);
    if mode == EncodeMode::Training {
        cols.require("Survived")?;
    }

    let feature_names = feature_names(config);
    let width = feature_names.len();

    let mut flat = Vec::with_capacity(parsed.rows.len() * width);
    let mut labels = Vec::new();
    let mut passenger_ids = Vec::with_capacity(parsed.rows.len());

    for (idx, row) in parsed.rows.iter().enumerate() {
        passenger_ids.push(cols.get(row, "PassengerId").unwrap_or("").to_string());

        // Pclass one-hot; anything outside 1..=3 falls to the default class 3
        let pclass = match cols.get(row, "Pclass").and_then(|v| v.parse::<i64>().ok()) {
            Some(c @ 1..=3) => c,
            _ => 3,
        };
        flat.push(if pclass == 1 { 1.0 } else { 0.0 });
        flat.push(if pclass == 2 { 1.0 } else { 0.0 });
        flat.push(if pclass == 3 { 1.0 } else { 0.0 });

        flat.push(if cols.get(row, "Sex") == Some("male") {
            1.0
        } else {
            0.0
        });

        let age = cols.parse_f64(row, "Age").unwrap_or(stats.age_median);
        flat.push((age - stats.age_median) / config.age_scale);

        let sibsp = cols
            .get(row, "SibSp")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        let parch = cols
            .get(row, "Parch")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0);
        flat.push(sibsp as f64);
        flat.push(parch as f64);

        let fare = cols.parse_f64(row, "Fare").unwrap_or(stats.fare_median);
        flat.push((fare - stats.fare_median) / config.fare_scale);

        // Embarked one-hot; absent or unrecognized ports take the mode so
        // exactly one bit is always set
        let port = match cols.non_empty(row, "Embarked") {
            Some(p @ ("C" | "Q" | "S")) => p,
            _ => stats.embarked_mode.as_str(),
        };
        flat.push(if port == "C" { 1.0 } else { 0.0 });
        flat.push(if port == "Q" { 1.0 } else { 0.0 });
        flat.push(if port == "S" { 1.0 } else { 0.0 });

        if config.family_features {
            let family_size = sibsp + parch + 1;
            flat.push(family_size as f64);
            flat.push(if family_size == 1 { 1.0 } else { 0.0 });
        }

        if mode == EncodeMode::Training {
            // the label array must stay index-aligned with the features, so
            // a missing label is a hard failure, not a silent drop
            let label = cols
                .non_empty(row, "Survived")
                .and_then(|v| v.parse::<i64>().ok())
                .ok_or_else(|| {
                    PipelineError::MalformedInput(format!(
                        "row {idx}: missing or unparsable survival label"
                    ))
                })?;
            labels.push(label as f64);
        }
    }

    let n = parsed.rows.len();
    let features = Array2::from_shape_vec((n, width), flat)
        .map_err(|e| PipelineError::MalformedInput(format!("feature matrix shape: {e}")))?;

    info!(
        rows = n,
        features = width,
        mode = ?mode,
        "encoded tabular dataset"
    );

    Ok(TabularDataset {
        features,
        labels: match mode {
            EncodeMode::Training => Some(Array1::from_vec(labels)),
            EncodeMode::Inference => None,
        },
        passenger_ids,
        feature_names,
    })
}

/// Feature names in encoding order
fn feature_names(config: &TabularConfig) -> Vec<String> {
    let mut names: Vec<String> = [
        "Pclass_1", "Pclass_2", "Pclass_3", "Sex_male", "Age_std", "SibSp", "Parch", "Fare_std",
        "Embarked_C", "Embarked_Q", "Embarked_S",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if config.family_features {
        names.push("FamilySize".to_string());
        names.push("IsAlone".to_string());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_csv;

    const HEADER: &str = "PassengerId,Survived,Pclass,Sex,Age,SibSp,Parch,Fare,Embarked";

    fn encode(text: &str, mode: EncodeMode, config: &TabularConfig) -> Result<TabularDataset> {
        let parsed = parse_csv(text).unwrap();
        let stats = ImputationStats::fit(&parsed);
        encode_dataset(&parsed, mode, &stats, config)
    }

    #[test]
    fn test_one_hot_invariants() {
        let text = format!(
            "{HEADER}\n1,0,1,male,22,1,0,7.25,S\n2,1,9,female,38,1,0,71.28,X\n3,1,3,female,26,0,0,7.92,Q\n"
        );
        let ds = encode(&text, EncodeMode::Training, &TabularConfig::default()).unwrap();

        for row in ds.features.rows() {
            let class_bits = row[0] + row[1] + row[2];
            let port_bits = row[8] + row[9] + row[10];
            assert!((class_bits - 1.0).abs() < 1e-10);
            assert!((port_bits - 1.0).abs() < 1e-10);
            assert!(row[3] == 0.0 || row[3] == 1.0);
        }

        // out-of-range class falls to class 3; unknown port to the mode
        assert_eq!(ds.features[[1, 2]], 1.0);
    }

    #[test]
    fn test_junk_heavy_port_column_still_sets_one_bit() {
        // the most frequent port value is unusable, so the fitted mode
        // falls back to S and every row still one-hots cleanly
        let text = format!(
            "{HEADER}\n1,0,1,male,22,0,0,7.25,X\n2,1,2,female,38,0,0,71.28,X\n3,1,3,female,26,0,0,7.92,C\n"
        );
        let ds = encode(&text, EncodeMode::Training, &TabularConfig::default()).unwrap();

        for row in ds.features.rows() {
            let port_bits = row[8] + row[9] + row[10];
            assert!((port_bits - 1.0).abs() < 1e-10);
        }
        // the junk rows took the S fallback
        assert_eq!(ds.features[[0, 10]], 1.0);
        assert_eq!(ds.features[[1, 10]], 1.0);
        assert_eq!(ds.features[[2, 8]], 1.0);
    }

    #[test]
    fn test_median_value_standardizes_to_zero() {
        let text = format!(
            "{HEADER}\n1,0,1,male,20,0,0,10,S\n2,1,2,female,30,0,0,20,S\n3,1,3,male,40,0,0,30,S\n"
        );
        let ds = encode(&text, EncodeMode::Training, &TabularConfig::default()).unwrap();

        // row 1 carries the median age and the median fare
        assert!(ds.features[[1, 4]].abs() < 1e-10);
        assert!(ds.features[[1, 7]].abs() < 1e-10);
    }

    #[test]
    fn test_missing_age_imputed_with_threaded_median() {
        let parsed = parse_csv(&format!(
            "{HEADER}\n1,0,1,male,,0,0,10,S\n"
        ))
        .unwrap();
        let stats = ImputationStats {
            age_median: 30.0,
            fare_median: 10.0,
            embarked_mode: "S".to_string(),
        };
        let ds = encode_dataset(
            &parsed,
            EncodeMode::Training,
            &stats,
            &TabularConfig::default(),
        )
        .unwrap();

        // imputed with the supplied median, so standardized exactly to zero
        assert!(ds.features[[0, 4]].abs() < 1e-10);
    }

    #[test]
    fn test_family_features() {
        let text = format!("{HEADER}\n1,0,1,male,22,2,1,7.25,S\n2,1,3,female,26,0,0,7.92,S\n");
        let config = TabularConfig::default().with_family_features(true);
        let ds = encode(&text, EncodeMode::Training, &config).unwrap();

        assert_eq!(ds.n_features(), 13);
        assert_eq!(ds.feature_names[11], "FamilySize");
        assert_eq!(ds.features[[0, 11]], 4.0);
        assert_eq!(ds.features[[0, 12]], 0.0);
        assert_eq!(ds.features[[1, 11]], 1.0);
        assert_eq!(ds.features[[1, 12]], 1.0);
    }

    #[test]
    fn test_missing_label_fails_loudly() {
        let text = format!("{HEADER}\n1,0,1,male,22,1,0,7.25,S\n2,,3,female,26,0,0,7.92,S\n");
        let err = encode(&text, EncodeMode::Training, &TabularConfig::default()).unwrap_err();

        assert!(matches!(err, PipelineError::MalformedInput(_)));
    }

    #[test]
    fn test_inference_mode_has_no_labels() {
        let text = "PassengerId,Pclass,Sex,Age,SibSp,Parch,Fare,Embarked\n10,1,male,22,1,0,7.25,S\n";
        let parsed = parse_csv(text).unwrap();
        let ds = encode_dataset(
            &parsed,
            EncodeMode::Inference,
            &ImputationStats::default(),
            &TabularConfig::default(),
        )
        .unwrap();

        assert!(ds.labels.is_none());
        assert_eq!(ds.passenger_ids, vec!["10"]);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let err = encode(HEADER, EncodeMode::Training, &TabularConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::DataInsufficiency(_)));
    }
}
