//! CSV ingest and schema normalization
//!
//! Parses delimited text into an ordered sequence of [`Row`]s:
//! - The first line defines column names and order.
//! - Quoted fields containing the delimiter are supported.
//! - Rows with extra fields are dropped with a counted warning, never fatally.
//! - Omitted trailing fields are recorded as absent, which is distinct from
//!   an empty field that was present.
//!
//! Column aliases (`Open` vs `open`) are resolved once against the parsed
//! header through an [`AliasTable`], not ad hoc per access.

mod aliases;
mod parser;

pub use aliases::{AliasTable, ResolvedColumns};
pub use parser::{parse_csv, parse_csv_file, ParsedCsv, Row};
