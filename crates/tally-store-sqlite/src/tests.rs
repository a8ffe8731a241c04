//! Integration tests for `SqliteStore` against an in-memory database.

use tally_core::{
  record::{NewObservation, UpdateOutcome},
  store::ScoreStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn obs(subject: &str, category: &str, value: i64) -> NewObservation {
  NewObservation::new(subject, category, value)
}

// ─── Recording ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn first_observation_creates_and_accepts() {
  let s = store().await;

  let outcome = s.record_observation(obs("alice", "kill", 100)).await.unwrap();
  assert_eq!(outcome, UpdateOutcome::Accepted { new_total: 100, delta: 100 });

  let record = s.get_score("alice", "kill").await.unwrap().unwrap();
  assert_eq!(record.subject, "alice");
  assert_eq!(record.category, "kill");
  assert_eq!(record.value, 100);
}

#[tokio::test]
async fn first_observation_accepts_zero_and_negatives() {
  let s = store().await;

  let zero = s.record_observation(obs("zed", "vs", 0)).await.unwrap();
  assert_eq!(zero, UpdateOutcome::Accepted { new_total: 0, delta: 0 });

  let neg = s.record_observation(obs("nia", "vs", -40)).await.unwrap();
  assert_eq!(neg, UpdateOutcome::Accepted { new_total: -40, delta: -40 });

  // Zero is a stored value, not "unset": a second zero is rejected.
  let again = s.record_observation(obs("zed", "vs", 0)).await.unwrap();
  assert_eq!(again, UpdateOutcome::Rejected { current: 0 });
}

#[tokio::test]
async fn lower_or_equal_observation_is_rejected_without_mutation() {
  let s = store().await;
  s.record_observation(obs("alice", "kill", 100)).await.unwrap();

  let lower = s.record_observation(obs("alice", "kill", 80)).await.unwrap();
  assert_eq!(lower, UpdateOutcome::Rejected { current: 100 });

  let equal = s.record_observation(obs("alice", "kill", 100)).await.unwrap();
  assert_eq!(equal, UpdateOutcome::Rejected { current: 100 });

  let record = s.get_score("alice", "kill").await.unwrap().unwrap();
  assert_eq!(record.value, 100);
  assert_eq!(s.get_history("alice", "kill", None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn greater_observation_ratchets_with_delta() {
  let s = store().await;
  s.record_observation(obs("alice", "kill", 100)).await.unwrap();

  let outcome = s.record_observation(obs("alice", "kill", 150)).await.unwrap();
  assert_eq!(outcome, UpdateOutcome::Accepted { new_total: 150, delta: 50 });
  assert_eq!(s.get_score("alice", "kill").await.unwrap().unwrap().value, 150);
}

#[tokio::test]
async fn extreme_magnitudes_ratchet_with_saturated_delta() {
  let s = store().await;

  let first = s.record_observation(obs("max", "kill", i64::MIN)).await.unwrap();
  assert_eq!(first, UpdateOutcome::Accepted {
    new_total: i64::MIN,
    delta:     i64::MIN,
  });

  // The full-range gap is not representable; the delta saturates while the
  // stored value stays exact.
  let second =
    s.record_observation(obs("max", "kill", i64::MAX)).await.unwrap();
  assert_eq!(second, UpdateOutcome::Accepted {
    new_total: i64::MAX,
    delta:     i64::MAX,
  });

  let record = s.get_score("max", "kill").await.unwrap().unwrap();
  assert_eq!(record.value, i64::MAX);

  let history = s.get_history("max", "kill", None).await.unwrap();
  assert_eq!(history[0].previous_value, Some(i64::MIN));
  assert_eq!(history[0].new_value, i64::MAX);
  assert_eq!(history[0].delta, i64::MAX);
}

#[tokio::test]
async fn empty_identifiers_are_invalid_input() {
  let s = store().await;

  let err = s.record_observation(obs("", "kill", 1)).await.unwrap_err();
  assert!(matches!(err, crate::Error::Core(tally_core::Error::EmptySubject)));

  let err = s.record_observation(obs("alice", "  ", 1)).await.unwrap_err();
  assert!(matches!(err, crate::Error::Core(tally_core::Error::EmptyCategory)));

  assert!(s.list_records().await.unwrap().is_empty());
}

// ─── History ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn history_records_every_accepted_transition_newest_first() {
  let s = store().await;
  s.record_observation(obs("alice", "kill", 100)).await.unwrap();
  s.record_observation(obs("alice", "kill", 80)).await.unwrap(); // rejected
  s.record_observation(obs("alice", "kill", 150)).await.unwrap();

  let history = s.get_history("alice", "kill", None).await.unwrap();
  assert_eq!(history.len(), 2);

  assert_eq!(history[0].sequence, 2);
  assert_eq!(history[0].previous_value, Some(100));
  assert_eq!(history[0].new_value, 150);
  assert_eq!(history[0].delta, 50);

  assert_eq!(history[1].sequence, 1);
  assert_eq!(history[1].previous_value, None);
  assert_eq!(history[1].new_value, 100);
  assert_eq!(history[1].delta, 100);

  // Last accepted entry always matches the materialised record.
  let record = s.get_score("alice", "kill").await.unwrap().unwrap();
  assert_eq!(history[0].new_value, record.value);
}

#[tokio::test]
async fn history_limit_and_unknown_pair() {
  let s = store().await;
  for v in [10, 20, 30, 40] {
    s.record_observation(obs("bob", "vs", v)).await.unwrap();
  }

  let latest = s.get_history("bob", "vs", Some(2)).await.unwrap();
  assert_eq!(latest.len(), 2);
  assert_eq!(latest[0].new_value, 40);
  assert_eq!(latest[1].new_value, 30);

  assert!(s.get_history("nobody", "vs", None).await.unwrap().is_empty());

  // A limit wider than i64 still truncates (to everything), never inverts.
  let all = s.get_history("bob", "vs", Some(usize::MAX)).await.unwrap();
  assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn history_is_scoped_per_pair() {
  let s = store().await;
  s.record_observation(obs("alice", "kill", 100)).await.unwrap();
  s.record_observation(obs("alice", "vs", 7)).await.unwrap();
  s.record_observation(obs("bob", "kill", 9)).await.unwrap();

  let history = s.get_history("alice", "kill", None).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].new_value, 100);
}

// ─── Ranking ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn ranking_is_value_desc_then_subject_asc() {
  let s = store().await;
  s.record_observation(obs("b", "kill", 10)).await.unwrap();
  s.record_observation(obs("a", "kill", 10)).await.unwrap();
  s.record_observation(obs("c", "kill", 5)).await.unwrap();
  s.record_observation(obs("other", "vs", 999)).await.unwrap();

  let ranked = s.ranked_snapshot("kill", None).await.unwrap();
  let pairs: Vec<(&str, i64)> =
    ranked.iter().map(|r| (r.subject.as_str(), r.value)).collect();
  assert_eq!(pairs, vec![("a", 10), ("b", 10), ("c", 5)]);
}

#[tokio::test]
async fn ranking_truncates_to_top_n() {
  let s = store().await;
  for (name, v) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
    s.record_observation(obs(name, "kill", v)).await.unwrap();
  }

  let top = s.ranked_snapshot("kill", Some(2)).await.unwrap();
  assert_eq!(top.len(), 2);
  assert_eq!(top[0].subject, "d");
  assert_eq!(top[1].subject, "c");
}

#[tokio::test]
async fn ranking_empty_category_is_empty_not_error() {
  let s = store().await;
  assert!(s.ranked_snapshot("kill", None).await.unwrap().is_empty());
}

// ─── Forget ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn forget_clears_record_and_history() {
  let s = store().await;
  s.record_observation(obs("alice", "kill", 100)).await.unwrap();
  s.record_observation(obs("alice", "kill", 150)).await.unwrap();
  s.record_observation(obs("alice", "vs", 3)).await.unwrap();

  s.forget("alice", "kill").await.unwrap();

  assert!(s.get_score("alice", "kill").await.unwrap().is_none());
  assert!(s.get_history("alice", "kill", None).await.unwrap().is_empty());

  // The other category is untouched.
  assert_eq!(s.get_score("alice", "vs").await.unwrap().unwrap().value, 3);
}

#[tokio::test]
async fn forget_is_idempotent_and_resets_the_ratchet() {
  let s = store().await;
  s.forget("ghost", "kill").await.unwrap(); // absent pair: no-op

  s.record_observation(obs("alice", "kill", 100)).await.unwrap();
  s.forget("alice", "kill").await.unwrap();
  s.forget("alice", "kill").await.unwrap();

  // A fresh first observation may be lower than the forgotten value.
  let outcome = s.record_observation(obs("alice", "kill", 10)).await.unwrap();
  assert_eq!(outcome, UpdateOutcome::Accepted { new_total: 10, delta: 10 });

  let history = s.get_history("alice", "kill", None).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].previous_value, None);
  assert_eq!(history[0].sequence, 1);
}

// ─── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_records_covers_all_pairs_in_stable_order() {
  let s = store().await;
  s.record_observation(obs("bob", "vs", 1)).await.unwrap();
  s.record_observation(obs("alice", "kill", 2)).await.unwrap();
  s.record_observation(obs("bob", "kill", 3)).await.unwrap();

  let all = s.list_records().await.unwrap();
  let keys: Vec<(&str, &str)> = all
    .iter()
    .map(|r| (r.category.as_str(), r.subject.as_str()))
    .collect();
  assert_eq!(keys, vec![("kill", "alice"), ("kill", "bob"), ("vs", "bob")]);
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_observations_serialise_into_one_chain() {
  let s = store().await;
  s.record_observation(obs("bob", "vs", 100)).await.unwrap();

  let s1 = s.clone();
  let s2 = s.clone();
  let t1 =
    tokio::spawn(async move { s1.record_observation(obs("bob", "vs", 200)).await });
  let t2 =
    tokio::spawn(async move { s2.record_observation(obs("bob", "vs", 300)).await });
  t1.await.unwrap().unwrap();
  t2.await.unwrap().unwrap();

  // Whichever serialisation happened, the ratchet lands on 300 and the
  // history chains — no two entries may claim the same previous value.
  assert_eq!(s.get_score("bob", "vs").await.unwrap().unwrap().value, 300);

  let mut history = s.get_history("bob", "vs", None).await.unwrap();
  history.reverse(); // chronological
  for window in history.windows(2) {
    assert_eq!(window[1].previous_value, Some(window[0].new_value));
  }
  let previous: Vec<Option<i64>> =
    history.iter().map(|e| e.previous_value).collect();
  let mut deduped = previous.clone();
  deduped.dedup();
  assert_eq!(previous, deduped);
}
