//! Error types for the tally-tabular codec.
//!
//! Every variant carries the 1-based line number of the offending row; a bad
//! row never aborts the rest of the input.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("line {line}: expected subject,category,value — got {found} fields")]
  WrongFieldCount { line: usize, found: usize },

  #[error("line {line}: unterminated quoted field")]
  UnterminatedQuote { line: usize },

  #[error("line {line}: {raw:?} is not a valid integer value")]
  InvalidValue { line: usize, raw: String },

  #[error("line {line}: {source}")]
  InvalidPair {
    line:   usize,
    source: tally_core::Error,
  },
}

impl Error {
  /// The input line this error refers to.
  pub fn line(&self) -> usize {
    match self {
      Self::WrongFieldCount { line, .. }
      | Self::UnterminatedQuote { line }
      | Self::InvalidValue { line, .. }
      | Self::InvalidPair { line, .. } => *line,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
