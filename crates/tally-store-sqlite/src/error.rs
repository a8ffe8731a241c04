//! Error type for `tally-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tally_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// The database stayed busy/locked through the bounded retry loop.
  /// Lock contention is never surfaced as a distinct user-facing error.
  #[error("storage unavailable after {attempts} attempts")]
  Unavailable { attempts: u32 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
