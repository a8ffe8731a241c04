//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Values, deltas, and
//! sequence numbers map directly onto SQLite INTEGER columns.

use chrono::{DateTime, Utc};
use tally_core::record::{HistoryEntry, ScoreRecord};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw columns read from a `score_records` row.
pub struct RawScoreRecord {
  pub subject:    String,
  pub category:   String,
  pub value:      i64,
  pub updated_at: String,
}

impl RawScoreRecord {
  pub fn into_record(self) -> Result<ScoreRecord> {
    Ok(ScoreRecord {
      subject:    self.subject,
      category:   self.category,
      value:      self.value,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw columns read from a `history_entries` row.
pub struct RawHistoryEntry {
  pub subject:        String,
  pub category:       String,
  pub previous_value: Option<i64>,
  pub new_value:      i64,
  pub delta:          i64,
  pub recorded_at:    String,
  pub sequence:       i64,
}

impl RawHistoryEntry {
  pub fn into_entry(self) -> Result<HistoryEntry> {
    Ok(HistoryEntry {
      subject:        self.subject,
      category:       self.category,
      previous_value: self.previous_value,
      new_value:      self.new_value,
      delta:          self.delta,
      recorded_at:    decode_dt(&self.recorded_at)?,
      sequence:       self.sequence as u64,
    })
  }
}
