//! CSV text parsing into named rows

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::error::{PipelineError, Result};

/// One parsed CSV row: a mapping from column name to raw cell value.
///
/// A cell holds `Some(value)` when the field was present in the line (an
/// empty string counts as present) and `None` when the line ended before the
/// column, so downstream imputation can tell the two apart.
#[derive(Debug, Clone)]
pub struct Row {
    cells: HashMap<String, Option<String>>,
}

impl Row {
    /// Look up a present cell value. Returns `None` for absent fields and
    /// unknown columns alike; the raw value may be the empty string.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).and_then(|v| v.as_deref())
    }

    /// True when the column exists in the header but the field was omitted
    pub fn is_absent(&self, column: &str) -> bool {
        matches!(self.cells.get(column), Some(None))
    }

    /// Parse a cell as `f64`, treating absent, empty and unparsable values as missing
    pub fn parse_f64(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(|v| v.parse::<f64>().ok())
    }

    /// Parse a cell as `i64`, treating absent, empty and unparsable values as missing
    pub fn parse_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(|v| v.parse::<i64>().ok())
    }

    /// Non-empty string value of a cell, if any
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|v| !v.is_empty())
    }
}

/// Result of parsing one CSV document
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    /// Column names in header order
    pub headers: Vec<String>,
    /// Rows that passed structural validation, in input order
    pub rows: Vec<Row>,
    /// Count of lines dropped for structural problems
    pub skipped: usize,
}

impl ParsedCsv {
    /// Percentage of missing (absent or empty) values per column, in header order.
    ///
    /// The numbers the data-overview table is built from; rendering is the
    /// caller's concern.
    pub fn missing_percentage(&self) -> Vec<(String, f64)> {
        let total = self.rows.len();
        self.headers
            .iter()
            .map(|h| {
                let missing = self
                    .rows
                    .iter()
                    .filter(|r| r.non_empty(h).is_none())
                    .count();
                let pct = if total == 0 {
                    0.0
                } else {
                    missing as f64 / total as f64 * 100.0
                };
                (h.clone(), pct)
            })
            .collect()
    }
}

/// Parse delimited text into rows.
///
/// Pure function of the input text. The first line is the header; a data
/// line with more fields than the header is dropped (with a warning and a
/// bump of `skipped`), while missing trailing fields are kept as absent.
pub fn parse_csv(text: &str) -> Result<ParsedCsv> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::MalformedInput(format!("unreadable header: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        return Err(PipelineError::MalformedInput("empty header line".into()));
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (line_no, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!(line = line_no + 2, error = %e, "skipping unreadable row");
                skipped += 1;
                continue;
            }
        };

        if record.len() > headers.len() {
            warn!(
                line = line_no + 2,
                fields = record.len(),
                expected = headers.len(),
                "skipping row with extra fields"
            );
            skipped += 1;
            continue;
        }

        let mut cells = HashMap::with_capacity(headers.len());
        for (idx, header) in headers.iter().enumerate() {
            let cell = record.get(idx).map(|v| v.to_string());
            cells.insert(header.clone(), cell);
        }
        rows.push(Row { cells });
    }

    Ok(ParsedCsv {
        headers,
        rows,
        skipped,
    })
}

/// Parse a CSV file from disk
pub fn parse_csv_file<P: AsRef<Path>>(path: P) -> Result<ParsedCsv> {
    let text = std::fs::read_to_string(path)?;
    parse_csv(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_parse() {
        let text = "a,b,c\n1,2,3\n4,5,6\n";
        let parsed = parse_csv(text).unwrap();

        assert_eq!(parsed.headers, vec!["a", "b", "c"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.rows[0].get("a"), Some("1"));
        assert_eq!(parsed.rows[1].get("c"), Some("6"));
    }

    #[test]
    fn test_row_count_accounting() {
        // rows + skipped must equal data line count
        let text = "a,b\n1,2\n1,2,3,4\n5,6\n";
        let parsed = parse_csv(text).unwrap();

        assert_eq!(parsed.rows.len() + parsed.skipped, 3);
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_quoted_delimiter() {
        let text = "name,desc\nalice,\"runs, jumps\"\n";
        let parsed = parse_csv(text).unwrap();

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].get("desc"), Some("runs, jumps"));
    }

    #[test]
    fn test_absent_vs_empty() {
        let text = "a,b,c\n1,,3\n1\n";
        let parsed = parse_csv(text).unwrap();

        // present but empty
        assert_eq!(parsed.rows[0].get("b"), Some(""));
        assert!(!parsed.rows[0].is_absent("b"));

        // trailing fields omitted entirely
        assert_eq!(parsed.rows[1].get("b"), None);
        assert!(parsed.rows[1].is_absent("b"));
        assert!(parsed.rows[1].is_absent("c"));
    }

    #[test]
    fn test_numeric_helpers() {
        let text = "x,y\n1.5,oops\n";
        let parsed = parse_csv(text).unwrap();

        assert_eq!(parsed.rows[0].parse_f64("x"), Some(1.5));
        assert_eq!(parsed.rows[0].parse_f64("y"), None);
        assert_eq!(parsed.rows[0].parse_i64("y"), None);
    }

    #[test]
    fn test_missing_percentage() {
        let text = "a,b\n1,\n2,3\n";
        let parsed = parse_csv(text).unwrap();
        let missing = parsed.missing_percentage();

        assert_eq!(missing[0], ("a".to_string(), 0.0));
        assert!((missing[1].1 - 50.0).abs() < 1e-10);
    }
}
