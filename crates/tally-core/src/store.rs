//! The `ScoreStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `tally-store-sqlite`,
//! or the in-memory [`MemoryStore`](crate::memory::MemoryStore)). Higher
//! layers (`tally-api`, `tally-tabular`) depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::record::{
  HistoryEntry, NewObservation, RankedEntry, ScoreRecord, UpdateOutcome,
};

/// Abstraction over a Tally score ledger backend.
///
/// `record_observation` for a given (subject, category) pair must be
/// serialised by the implementation: the read of the current value and the
/// conditional write must be atomic with respect to other observations on
/// the same pair, so that two concurrent observations can never both read
/// the same current value and both accept. Different pairs carry no
/// cross-pair ordering guarantee. Reads may observe any committed state.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ScoreStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Apply one observation under the ratchet rule.
  ///
  /// A fresh pair is created and accepts unconditionally; an existing pair
  /// accepts only strictly greater values. On acceptance the record update
  /// and the history insert are atomic (both happen or neither does).
  /// Rejection is an ordinary [`UpdateOutcome`], never an error.
  fn record_observation(
    &self,
    input: NewObservation,
  ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + '_;

  /// Remove the record and all history for a pair. Idempotent: forgetting
  /// an absent pair is a no-op, not an error.
  fn forget<'a>(
    &'a self,
    subject: &'a str,
    category: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Current materialised value for a pair. Returns `None` if the pair has
  /// never been observed (or has been forgotten).
  fn get_score<'a>(
    &'a self,
    subject: &'a str,
    category: &'a str,
  ) -> impl Future<Output = Result<Option<ScoreRecord>, Self::Error>> + Send + 'a;

  /// Accepted transitions for a pair, most recent first (highest sequence
  /// number leading). Empty for unknown pairs. `limit` truncates.
  fn get_history<'a>(
    &'a self,
    subject: &'a str,
    category: &'a str,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<HistoryEntry>, Self::Error>> + Send + 'a;

  /// All records in `category`, value descending with ties broken by
  /// subject ascending, optionally truncated to `top_n`.
  fn ranked_snapshot<'a>(
    &'a self,
    category: &'a str,
    top_n: Option<usize>,
  ) -> impl Future<Output = Result<Vec<RankedEntry>, Self::Error>> + Send + 'a;

  /// Every current record across all categories, ordered by category then
  /// subject. Used by the export path.
  fn list_records(
    &self,
  ) -> impl Future<Output = Result<Vec<ScoreRecord>, Self::Error>> + Send + '_;
}
