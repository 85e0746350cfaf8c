//! Column-alias resolution
//!
//! Input files spell the same column in different ways (`Open` vs `open`).
//! Instead of per-access fallback chains, an [`AliasTable`] is resolved once
//! against the parsed header and every later access goes through the
//! resulting [`ResolvedColumns`].

use std::collections::HashMap;

use crate::error::{PipelineError, Result};
use crate::ingest::Row;

/// Canonical column names with their accepted header spellings
#[derive(Debug, Clone)]
pub struct AliasTable {
    entries: Vec<(String, Vec<String>)>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a canonical column. The canonical name itself is always
    /// accepted; `aliases` are tried in order after it.
    pub fn column(mut self, canonical: &str, aliases: &[&str]) -> Self {
        let mut names = vec![canonical.to_string()];
        names.extend(aliases.iter().map(|a| a.to_string()));
        self.entries.push((canonical.to_string(), names));
        self
    }

    /// Alias table for the OHLCV time-series schema
    pub fn ohlcv() -> Self {
        Self::new()
            .column("Symbol", &["symbol", "Ticker", "ticker"])
            .column("Date", &["date"])
            .column("Open", &["open"])
            .column("Close", &["close"])
            .column("High", &["high"])
            .column("Low", &["low"])
            .column("Volume", &["volume"])
    }

    /// Alias table for the passenger survival schema
    pub fn survival() -> Self {
        Self::new()
            .column("PassengerId", &["passengerid", "passenger_id"])
            .column("Survived", &["survived"])
            .column("Pclass", &["pclass"])
            .column("Sex", &["sex"])
            .column("Age", &["age"])
            .column("SibSp", &["sibsp"])
            .column("Parch", &["parch"])
            .column("Fare", &["fare"])
            .column("Embarked", &["embarked"])
    }

    /// Resolve canonical names against a concrete header, once.
    ///
    /// Canonical columns with no matching header are simply unresolved;
    /// whether that is fatal is the consumer's decision.
    pub fn resolve(&self, headers: &[String]) -> ResolvedColumns {
        let mut map = HashMap::new();
        for (canonical, names) in &self.entries {
            if let Some(actual) = names.iter().find(|n| headers.iter().any(|h| h == *n)) {
                map.insert(canonical.clone(), actual.clone());
            }
        }
        ResolvedColumns { map }
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of resolving an [`AliasTable`] against one header
#[derive(Debug, Clone)]
pub struct ResolvedColumns {
    map: HashMap<String, String>,
}

impl ResolvedColumns {
    /// Actual header name for a canonical column, if the file has it
    pub fn header(&self, canonical: &str) -> Option<&str> {
        self.map.get(canonical).map(|s| s.as_str())
    }

    /// Fetch a present cell through the canonical name
    pub fn get<'a>(&self, row: &'a Row, canonical: &str) -> Option<&'a str> {
        self.header(canonical).and_then(|h| row.get(h))
    }

    /// Fetch and parse a cell as `f64` through the canonical name
    pub fn parse_f64(&self, row: &Row, canonical: &str) -> Option<f64> {
        self.header(canonical).and_then(|h| row.parse_f64(h))
    }

    /// Fetch a non-empty cell through the canonical name
    pub fn non_empty<'a>(&self, row: &'a Row, canonical: &str) -> Option<&'a str> {
        self.header(canonical).and_then(|h| row.non_empty(h))
    }

    /// Require a column to have resolved, failing with a descriptive error
    pub fn require(&self, canonical: &str) -> Result<&str> {
        self.header(canonical).ok_or_else(|| {
            PipelineError::MalformedInput(format!("required column not found: {canonical}"))
        })
    }
}
