//! Chart data preparation.
//!
//! The ledger never renders anything; an external renderer consumes the
//! ordered (label, value) pairs of a [`ChartSeries`] (bar/pie charts over a
//! ranked snapshot) or the (timestamp, value) points of a
//! [`HistorySeries`] (line chart over one pair's history).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_core::record::{HistoryEntry, RankedEntry};

/// Ordered labels and values for a categorical chart. Order follows the
/// snapshot: value descending, ties broken by subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSeries {
  pub title:  String,
  pub labels: Vec<String>,
  pub values: Vec<i64>,
}

impl ChartSeries {
  pub fn from_snapshot(title: impl Into<String>, ranked: &[RankedEntry]) -> Self {
    Self {
      title:  title.into(),
      labels: ranked.iter().map(|r| r.subject.clone()).collect(),
      values: ranked.iter().map(|r| r.value).collect(),
    }
  }
}

/// Chronological (timestamp, value) points for one pair's line chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySeries {
  pub title:  String,
  pub points: Vec<(DateTime<Utc>, i64)>,
}

impl HistorySeries {
  /// Accepts history in any order (stores return newest-first) and sorts
  /// into chronological order by sequence number.
  pub fn from_history(
    title: impl Into<String>,
    history: &[HistoryEntry],
  ) -> Self {
    let mut entries: Vec<&HistoryEntry> = history.iter().collect();
    entries.sort_by_key(|e| e.sequence);
    Self {
      title:  title.into(),
      points: entries.iter().map(|e| (e.recorded_at, e.new_value)).collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use tally_core::record::{HistoryEntry, RankedEntry};

  use super::*;

  #[test]
  fn chart_series_preserves_snapshot_order() {
    let ranked = vec![
      RankedEntry { subject: "a".into(), value: 10 },
      RankedEntry { subject: "b".into(), value: 10 },
      RankedEntry { subject: "c".into(), value: 5 },
    ];
    let series = ChartSeries::from_snapshot("kill", &ranked);
    assert_eq!(series.labels, vec!["a", "b", "c"]);
    assert_eq!(series.values, vec![10, 10, 5]);
  }

  #[test]
  fn history_series_sorts_chronologically() {
    let at = |m| Utc.with_ymd_and_hms(2024, 6, 1, 0, m, 0).unwrap();
    let entry = |sequence, minute, new_value| HistoryEntry {
      subject: "alice".into(),
      category: "kill".into(),
      previous_value: None,
      new_value,
      delta: new_value,
      recorded_at: at(minute),
      sequence,
    };

    // Newest-first, as stores return it.
    let history = vec![entry(2, 5, 150), entry(1, 0, 100)];
    let series = HistorySeries::from_history("alice / kill", &history);
    assert_eq!(series.points, vec![(at(0), 100), (at(5), 150)]);
  }
}
