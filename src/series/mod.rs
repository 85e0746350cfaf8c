//! Multi-symbol time-series preparation
//!
//! The walk-forward data path for the price-direction models:
//! - [`PriceTable`]: OHLCV points keyed by (symbol, date), dates strictly
//!   increasing and de-duplicated within each symbol.
//! - [`normalize`]: per-symbol min-max scaling of open and close.
//! - [`build_sequences`]: fixed-length sliding windows with forward-looking
//!   binary labels and a chronological train/test split.

mod normalizer;
mod sequencer;
mod types;

pub use normalizer::{normalize, NormalizedPoint, NormalizedTable};
pub use sequencer::{build_sequences, SequenceConfig, SequenceDataset};
pub use types::{PricePoint, PriceTable};
