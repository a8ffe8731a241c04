//! Error types for `tally-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("subject must be a non-empty identifier")]
  EmptySubject,

  #[error("category must be a non-empty tag")]
  EmptyCategory,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
