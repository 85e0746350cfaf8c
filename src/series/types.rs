//! Price table types and construction

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PipelineError, Result};
use crate::ingest::{AliasTable, ParsedCsv};

/// One OHLCV observation for a symbol on a date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
}

/// All loaded price series, keyed by (symbol, date).
///
/// Symbols and dates are kept sorted; the symbol order is the fixed order
/// used for feature concatenation and label slots everywhere downstream.
#[derive(Debug, Clone)]
pub struct PriceTable {
    symbols: Vec<String>,
    dates: Vec<NaiveDate>,
    data: HashMap<String, BTreeMap<NaiveDate, PricePoint>>,
    /// Rows dropped for missing keys or unparsable prices
    pub skipped: usize,
}

impl PriceTable {
    /// Build a table from ingested rows via the OHLCV alias table.
    ///
    /// Rows without a symbol, without a parsable date, or with unparsable
    /// open/close are skipped with a counted warning. Missing high/low fall
    /// back to the open, missing volume to zero. A later row for the same
    /// (symbol, date) replaces the earlier one.
    pub fn from_csv(parsed: &ParsedCsv) -> Result<Self> {
        let cols = AliasTable::ohlcv().resolve(&parsed.headers);
        for required in ["Symbol", "Date", "Open", "Close"] {
            cols.require(required)?;
        }

        let mut data: HashMap<String, BTreeMap<NaiveDate, PricePoint>> = HashMap::new();
        let mut all_dates = BTreeSet::new();
        let mut skipped = 0usize;

        for (idx, row) in parsed.rows.iter().enumerate() {
            let Some(symbol) = cols.non_empty(row, "Symbol") else {
                warn!(row = idx, "skipping row without symbol");
                skipped += 1;
                continue;
            };
            let date = cols
                .non_empty(row, "Date")
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            let Some(date) = date else {
                warn!(row = idx, symbol, "skipping row with unparsable date");
                skipped += 1;
                continue;
            };
            let (Some(open), Some(close)) = (
                cols.parse_f64(row, "Open"),
                cols.parse_f64(row, "Close"),
            ) else {
                warn!(row = idx, symbol, %date, "skipping row with unparsable prices");
                skipped += 1;
                continue;
            };

            let point = PricePoint {
                date,
                open,
                close,
                high: cols.parse_f64(row, "High").unwrap_or(open),
                low: cols.parse_f64(row, "Low").unwrap_or(open),
                volume: cols.parse_f64(row, "Volume").unwrap_or(0.0),
            };

            all_dates.insert(date);
            data.entry(symbol.to_string()).or_default().insert(date, point);
        }

        if data.is_empty() {
            return Err(PipelineError::DataInsufficiency(
                "no usable price rows".into(),
            ));
        }

        let mut symbols: Vec<String> = data.keys().cloned().collect();
        symbols.sort();
        let dates: Vec<NaiveDate> = all_dates.into_iter().collect();

        info!(
            symbols = symbols.len(),
            dates = dates.len(),
            skipped,
            "loaded price table"
        );

        Ok(Self {
            symbols,
            dates,
            data,
            skipped,
        })
    }

    /// Tracked symbols in the fixed (sorted) order
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Union of observed dates, sorted ascending
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// The observation for one symbol on one date, if any
    pub fn point(&self, symbol: &str, date: NaiveDate) -> Option<&PricePoint> {
        self.data.get(symbol).and_then(|series| series.get(&date))
    }

    /// Raw close price for one symbol on one date, if observed
    pub fn close(&self, symbol: &str, date: NaiveDate) -> Option<f64> {
        self.point(symbol, date).map(|p| p.close)
    }

    /// Full ordered series of one symbol
    pub fn series(&self, symbol: &str) -> Option<&BTreeMap<NaiveDate, PricePoint>> {
        self.data.get(symbol)
    }
}
