//! In-memory reference implementation of [`ScoreStore`].
//!
//! Backs tests and any caller that does not need durability. A single mutex
//! guards the whole map, so every read-then-conditional-write runs as one
//! critical section — a stronger serialisation than the per-pair contract
//! requires, which is fine at this scale.

use std::{
  collections::HashMap,
  sync::{Mutex, MutexGuard},
};

use chrono::Utc;

use crate::{
  Error, Result,
  ratchet::{self, RatchetDecision},
  record::{
    HistoryEntry, NewObservation, RankedEntry, ScoreRecord, UpdateOutcome,
    validate_pair,
  },
  store::ScoreStore,
};

#[derive(Debug)]
struct PairState {
  value:      i64,
  updated_at: chrono::DateTime<Utc>,
  history:    Vec<HistoryEntry>,
}

/// A score ledger held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
  pairs: Mutex<HashMap<(String, String), PairState>>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> MutexGuard<'_, HashMap<(String, String), PairState>> {
    // A poisoned lock only means another test thread panicked mid-call;
    // the map itself is still structurally sound.
    self.pairs.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl ScoreStore for MemoryStore {
  type Error = Error;

  async fn record_observation(
    &self,
    input: NewObservation,
  ) -> Result<UpdateOutcome> {
    input.validate()?;
    let now = Utc::now();

    let mut pairs = self.lock();
    let key = (input.subject.clone(), input.category.clone());
    let current = pairs.get(&key).map(|p| p.value);

    match ratchet::evaluate(current, input.value) {
      RatchetDecision::Reject { current } => {
        Ok(UpdateOutcome::Rejected { current })
      }
      RatchetDecision::Accept { previous, delta } => {
        let state = pairs.entry(key).or_insert_with(|| PairState {
          value:      input.value,
          updated_at: now,
          history:    Vec::new(),
        });
        let sequence = state.history.len() as u64 + 1;
        let new_total = input.value;
        state.value = new_total;
        state.updated_at = now;
        state.history.push(HistoryEntry {
          subject:        input.subject,
          category:       input.category,
          previous_value: previous,
          new_value:      new_total,
          delta,
          recorded_at:    now,
          sequence,
        });
        Ok(UpdateOutcome::Accepted { new_total, delta })
      }
    }
  }

  async fn forget(&self, subject: &str, category: &str) -> Result<()> {
    validate_pair(subject, category)?;
    self.lock().remove(&(subject.to_owned(), category.to_owned()));
    Ok(())
  }

  async fn get_score(
    &self,
    subject: &str,
    category: &str,
  ) -> Result<Option<ScoreRecord>> {
    validate_pair(subject, category)?;
    Ok(self.lock().get(&(subject.to_owned(), category.to_owned())).map(
      |state| ScoreRecord {
        subject:    subject.to_owned(),
        category:   category.to_owned(),
        value:      state.value,
        updated_at: state.updated_at,
      },
    ))
  }

  async fn get_history(
    &self,
    subject: &str,
    category: &str,
    limit: Option<usize>,
  ) -> Result<Vec<HistoryEntry>> {
    validate_pair(subject, category)?;
    let pairs = self.lock();
    let mut entries = pairs
      .get(&(subject.to_owned(), category.to_owned()))
      .map(|state| state.history.clone())
      .unwrap_or_default();
    entries.reverse(); // stored oldest-first; callers want newest-first
    if let Some(n) = limit {
      entries.truncate(n);
    }
    Ok(entries)
  }

  async fn ranked_snapshot(
    &self,
    category: &str,
    top_n: Option<usize>,
  ) -> Result<Vec<RankedEntry>> {
    if category.trim().is_empty() {
      return Err(Error::EmptyCategory);
    }
    let pairs = self.lock();
    let mut ranked: Vec<RankedEntry> = pairs
      .iter()
      .filter(|((_, cat), _)| cat == category)
      .map(|((subject, _), state)| RankedEntry {
        subject: subject.clone(),
        value:   state.value,
      })
      .collect();
    ranked.sort_by(|a, b| {
      b.value.cmp(&a.value).then_with(|| a.subject.cmp(&b.subject))
    });
    if let Some(n) = top_n {
      ranked.truncate(n);
    }
    Ok(ranked)
  }

  async fn list_records(&self) -> Result<Vec<ScoreRecord>> {
    let pairs = self.lock();
    let mut records: Vec<ScoreRecord> = pairs
      .iter()
      .map(|((subject, category), state)| ScoreRecord {
        subject:    subject.clone(),
        category:   category.clone(),
        value:      state.value,
        updated_at: state.updated_at,
      })
      .collect();
    records.sort_by(|a, b| {
      a.category.cmp(&b.category).then_with(|| a.subject.cmp(&b.subject))
    });
    Ok(records)
  }
}
