//! Tabular codec and bulk transfer for Tally.
//!
//! Converts between `subject,category,value` row text and [`tally_core`]
//! domain types, drives bulk import through any
//! [`ScoreStore`](tally_core::store::ScoreStore), and prepares ordered
//! series for an external chart renderer. Pure synchronous apart from the
//! import driver; no HTTP or database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let parsed = tally_tabular::parse_rows("alice,kill,100\nbob,kill,80\n");
//! println!("{} rows, {} bad lines", parsed.rows.len(), parsed.errors.len());
//! ```

pub mod chart;
pub mod error;
mod import;
mod parse;
mod serialize;

pub use error::{Error, Result};
pub use import::{ImportSummary, import_rows};
pub use parse::{ParsedRows, parse_rows};
pub use serialize::{records_to_csv, snapshot_to_csv};
