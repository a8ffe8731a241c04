//! [`SqliteStore`] — the SQLite implementation of [`ScoreStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use tally_core::{
  ratchet::{self, RatchetDecision},
  record::{
    HistoryEntry, NewObservation, RankedEntry, ScoreRecord, UpdateOutcome,
    validate_pair,
  },
  store::ScoreStore,
};

use crate::{
  Error, Result,
  encode::{RawHistoryEntry, RawScoreRecord, encode_dt},
  schema::SCHEMA,
};

/// How many times a busy/locked write is attempted before giving up.
const WRITE_ATTEMPTS: u32 = 3;
/// Base backoff between write attempts; scaled linearly per attempt.
const BUSY_BACKOFF: Duration = Duration::from_millis(25);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Tally score ledger backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All calls
/// funnel through the connection's dedicated thread in submission order, so
/// the read-then-conditional-write inside `record_observation` can never
/// interleave with another observation on the same pair.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// One transactional attempt at applying an observation.
  ///
  /// The current value is read and the conditional write applied inside a
  /// single IMMEDIATE transaction, so the record update and the history
  /// insert commit together or not at all.
  async fn record_once(&self, input: &NewObservation) -> Result<UpdateOutcome> {
    let subject = input.subject.clone();
    let category = input.category.clone();
    let observed = input.value;
    let now_str = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let current: Option<i64> = tx
          .query_row(
            "SELECT value FROM score_records
             WHERE subject = ?1 AND category = ?2",
            rusqlite::params![subject, category],
            |row| row.get(0),
          )
          .optional()?;

        match ratchet::evaluate(current, observed) {
          RatchetDecision::Reject { current } => {
            // No mutation, no history entry; the transaction drops.
            Ok(UpdateOutcome::Rejected { current })
          }
          RatchetDecision::Accept { previous, delta } => {
            if previous.is_none() {
              tx.execute(
                "INSERT INTO score_records (subject, category, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![subject, category, observed, now_str],
              )?;
            } else {
              tx.execute(
                "UPDATE score_records SET value = ?3, updated_at = ?4
                 WHERE subject = ?1 AND category = ?2",
                rusqlite::params![subject, category, observed, now_str],
              )?;
            }

            let sequence: i64 = tx.query_row(
              "SELECT COALESCE(MAX(sequence), 0) + 1 FROM history_entries
               WHERE subject = ?1 AND category = ?2",
              rusqlite::params![subject, category],
              |row| row.get(0),
            )?;

            tx.execute(
              "INSERT INTO history_entries
                 (subject, category, previous_value, new_value, delta,
                  recorded_at, sequence)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
              rusqlite::params![
                subject, category, previous, observed, delta, now_str,
                sequence,
              ],
            )?;

            tx.commit()?;
            Ok(UpdateOutcome::Accepted { new_total: observed, delta })
          }
        }
      })
      .await?;

    Ok(outcome)
  }
}

/// SQLite treats a negative LIMIT as "no limit", so `None` maps to -1.
/// A limit beyond `i64::MAX` clamps rather than wrapping negative, which
/// would silently lift the truncation.
fn encode_limit(limit: Option<usize>) -> i64 {
  limit.map(|n| i64::try_from(n).unwrap_or(i64::MAX)).unwrap_or(-1)
}

/// Busy/locked failures are transient: another process holds the file lock.
fn is_busy(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.code == rusqlite::ErrorCode::DatabaseBusy
        || e.code == rusqlite::ErrorCode::DatabaseLocked
  )
}

// ─── ScoreStore impl ─────────────────────────────────────────────────────────

impl ScoreStore for SqliteStore {
  type Error = Error;

  async fn record_observation(
    &self,
    input: NewObservation,
  ) -> Result<UpdateOutcome> {
    input.validate().map_err(Error::Core)?;

    let mut attempt = 0;
    loop {
      attempt += 1;
      match self.record_once(&input).await {
        Err(Error::Database(e)) if is_busy(&e) => {
          if attempt >= WRITE_ATTEMPTS {
            return Err(Error::Unavailable { attempts: attempt });
          }
          tokio::time::sleep(BUSY_BACKOFF * attempt).await;
        }
        other => return other,
      }
    }
  }

  async fn forget(&self, subject: &str, category: &str) -> Result<()> {
    validate_pair(subject, category).map_err(Error::Core)?;

    let subject = subject.to_owned();
    let category = category.to_owned();

    self
      .conn
      .call(move |conn| {
        let tx =
          conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
          "DELETE FROM history_entries WHERE subject = ?1 AND category = ?2",
          rusqlite::params![subject, category],
        )?;
        tx.execute(
          "DELETE FROM score_records WHERE subject = ?1 AND category = ?2",
          rusqlite::params![subject, category],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_score(
    &self,
    subject: &str,
    category: &str,
  ) -> Result<Option<ScoreRecord>> {
    validate_pair(subject, category).map_err(Error::Core)?;

    let subject = subject.to_owned();
    let category = category.to_owned();

    let raw: Option<RawScoreRecord> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT subject, category, value, updated_at
               FROM score_records
               WHERE subject = ?1 AND category = ?2",
              rusqlite::params![subject, category],
              |row| {
                Ok(RawScoreRecord {
                  subject:    row.get(0)?,
                  category:   row.get(1)?,
                  value:      row.get(2)?,
                  updated_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawScoreRecord::into_record).transpose()
  }

  async fn get_history(
    &self,
    subject: &str,
    category: &str,
    limit: Option<usize>,
  ) -> Result<Vec<HistoryEntry>> {
    validate_pair(subject, category).map_err(Error::Core)?;

    let subject = subject.to_owned();
    let category = category.to_owned();
    let limit_val = encode_limit(limit);

    let raws: Vec<RawHistoryEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT subject, category, previous_value, new_value, delta,
                  recorded_at, sequence
           FROM history_entries
           WHERE subject = ?1 AND category = ?2
           ORDER BY sequence DESC
           LIMIT ?3",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![subject, category, limit_val], |row| {
            Ok(RawHistoryEntry {
              subject:        row.get(0)?,
              category:       row.get(1)?,
              previous_value: row.get(2)?,
              new_value:      row.get(3)?,
              delta:          row.get(4)?,
              recorded_at:    row.get(5)?,
              sequence:       row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawHistoryEntry::into_entry).collect()
  }

  async fn ranked_snapshot(
    &self,
    category: &str,
    top_n: Option<usize>,
  ) -> Result<Vec<RankedEntry>> {
    if category.trim().is_empty() {
      return Err(Error::Core(tally_core::Error::EmptyCategory));
    }

    let category = category.to_owned();
    let limit_val = encode_limit(top_n);

    let ranked: Vec<RankedEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT subject, value FROM score_records
           WHERE category = ?1
           ORDER BY value DESC, subject ASC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![category, limit_val], |row| {
            Ok(RankedEntry { subject: row.get(0)?, value: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(ranked)
  }

  async fn list_records(&self) -> Result<Vec<ScoreRecord>> {
    let raws: Vec<RawScoreRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT subject, category, value, updated_at
           FROM score_records
           ORDER BY category ASC, subject ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawScoreRecord {
              subject:    row.get(0)?,
              category:   row.get(1)?,
              value:      row.get(2)?,
              updated_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawScoreRecord::into_record).collect()
  }
}
