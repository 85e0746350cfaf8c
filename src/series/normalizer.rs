//! Per-symbol min-max normalization

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use super::types::PriceTable;

/// Open/close pair scaled into [0, 1] over the symbol's own range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    pub open: f64,
    pub close: f64,
}

/// Normalized view of a [`PriceTable`]
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    data: HashMap<String, BTreeMap<NaiveDate, NormalizedPoint>>,
}

impl NormalizedTable {
    pub fn point(&self, symbol: &str, date: NaiveDate) -> Option<&NormalizedPoint> {
        self.data.get(symbol).and_then(|series| series.get(&date))
    }
}

/// Scale every symbol's open and close into [0, 1] via min-max over that
/// symbol's full observed series. A flat series (zero range) maps to 0.5
/// instead of dividing by zero.
pub fn normalize(table: &PriceTable) -> NormalizedTable {
    let mut data = HashMap::new();

    for symbol in table.symbols() {
        let Some(series) = table.series(symbol) else {
            continue;
        };

        let mut open_min = f64::INFINITY;
        let mut open_max = f64::NEG_INFINITY;
        let mut close_min = f64::INFINITY;
        let mut close_max = f64::NEG_INFINITY;
        for point in series.values() {
            open_min = open_min.min(point.open);
            open_max = open_max.max(point.open);
            close_min = close_min.min(point.close);
            close_max = close_max.max(point.close);
        }
        let open_range = open_max - open_min;
        let close_range = close_max - close_min;

        let scaled: BTreeMap<NaiveDate, NormalizedPoint> = series
            .iter()
            .map(|(date, point)| {
                (
                    *date,
                    NormalizedPoint {
                        open: scale(point.open, open_min, open_range),
                        close: scale(point.close, close_min, close_range),
                    },
                )
            })
            .collect();

        data.insert(symbol.clone(), scaled);
    }

    NormalizedTable { data }
}

fn scale(value: f64, min: f64, range: f64) -> f64 {
    if range > 0.0 {
        (value - min) / range
    } else {
        0.5
    }
}
