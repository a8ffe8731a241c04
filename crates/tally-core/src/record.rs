//! Score records and history entries — the persisted units of the ledger.
//!
//! A `ScoreRecord` is the materialised current value for a (subject,
//! category) pair. History entries are immutable: once an observation is
//! accepted its entry is never updated or individually deleted; the only
//! bulk removal is [`forget`](crate::store::ScoreStore::forget).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Current value ───────────────────────────────────────────────────────────

/// The current materialised value for a (subject, category) pair.
///
/// `value` is monotonically non-decreasing for the lifetime of the pair;
/// the only way it goes away is `forget`, which removes the record entirely
/// rather than reverting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
  pub subject:    String,
  pub category:   String,
  pub value:      i64,
  /// Server-assigned; set on every accepted observation.
  pub updated_at: DateTime<Utc>,
}

// ─── History ─────────────────────────────────────────────────────────────────

/// An immutable audit record of one accepted ratchet transition.
///
/// `previous_value` is `None` exactly for the first entry of a pair, and
/// `new_value` is always ≥ `previous_value`. Rejected observations write no
/// entry at all, so consecutive entries chain without gaps in sequence even
/// though not every observation appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
  pub subject:        String,
  pub category:       String,
  pub previous_value: Option<i64>,
  pub new_value:      i64,
  /// `new_value − previous_value` (saturated at `i64::MAX` when the gap is
  /// not representable), or `new_value` for the first entry.
  pub delta:          i64,
  pub recorded_at:    DateTime<Utc>,
  /// Strictly increasing per (subject, category), starting at 1.
  pub sequence:       u64,
}

// ─── Ranking ─────────────────────────────────────────────────────────────────

/// One row of a [`ranked_snapshot`](crate::store::ScoreStore::ranked_snapshot):
/// value descending, ties broken by subject ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
  pub subject: String,
  pub value:   i64,
}

// ─── Input ───────────────────────────────────────────────────────────────────

/// Input to [`record_observation`](crate::store::ScoreStore::record_observation).
/// The timestamp is always set by the store; it is not accepted from callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewObservation {
  pub subject:  String,
  pub category: String,
  pub value:    i64,
}

impl NewObservation {
  pub fn new(
    subject: impl Into<String>,
    category: impl Into<String>,
    value: i64,
  ) -> Self {
    Self { subject: subject.into(), category: category.into(), value }
  }

  /// Reject empty or whitespace-only identifiers before any storage access.
  pub fn validate(&self) -> Result<()> {
    validate_pair(&self.subject, &self.category)
  }
}

/// Shared input check for every pair-addressed operation.
pub fn validate_pair(subject: &str, category: &str) -> Result<()> {
  if subject.trim().is_empty() {
    return Err(Error::EmptySubject);
  }
  if category.trim().is_empty() {
    return Err(Error::EmptyCategory);
  }
  Ok(())
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// The result classification of an observation — a first-class value,
/// distinct from errors. Callers branch on the variant, never on an error,
/// for the "value too low, ignored" case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum UpdateOutcome {
  /// The observation exceeded the current value (or the pair was fresh) and
  /// was applied.
  Accepted {
    new_total: i64,
    /// Gain over the previous value; equals `new_total` on first observation.
    delta:     i64,
  },
  /// The observation did not exceed the current value; nothing was written.
  Rejected { current: i64 },
}

impl UpdateOutcome {
  pub fn is_accepted(&self) -> bool { matches!(self, Self::Accepted { .. }) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validate_rejects_blank_subject() {
    let obs = NewObservation::new("  ", "kill", 10);
    assert!(matches!(obs.validate(), Err(Error::EmptySubject)));
  }

  #[test]
  fn validate_rejects_empty_category() {
    let obs = NewObservation::new("alice", "", 10);
    assert!(matches!(obs.validate(), Err(Error::EmptyCategory)));
  }

  #[test]
  fn validate_accepts_ordinary_pair() {
    assert!(NewObservation::new("alice", "vs", 0).validate().is_ok());
  }
}
