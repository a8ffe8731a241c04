//! Handler for `GET /leaderboard/{category}`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tally_core::store::ScoreStore;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
  /// Truncate to the top N subjects.
  pub top:          Option<usize>,
  /// If `true`, attach each subject's most recent accepted delta.
  /// Query-side only — the write path never takes a diff flag.
  #[serde(default)]
  pub include_diff: bool,
}

/// One leaderboard row. `rank` is 1-based; tied values still get distinct
/// ranks in snapshot order (value descending, subject ascending).
#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
  pub rank:       usize,
  pub subject:    String,
  pub value:      i64,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_delta: Option<i64>,
}

/// `GET /leaderboard/:category[?top=N][&include_diff=true]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Path(category): Path<String>,
  Query(params): Query<LeaderboardParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError>
where
  S: ScoreStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if category.trim().is_empty() {
    return Err(ApiError::BadRequest("category must not be empty".into()));
  }

  let ranked = store
    .ranked_snapshot(&category, params.top)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let mut entries = Vec::with_capacity(ranked.len());
  for (i, r) in ranked.into_iter().enumerate() {
    let last_delta = if params.include_diff {
      store
        .get_history(&r.subject, &category, Some(1))
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?
        .first()
        .map(|entry| entry.delta)
    } else {
      None
    };
    entries.push(LeaderboardEntry {
      rank: i + 1,
      subject: r.subject,
      value: r.value,
      last_delta,
    });
  }

  Ok(Json(entries))
}
