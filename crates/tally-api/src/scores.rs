//! Handlers for `/scores/{subject}/{category}` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/scores/:subject/:category` | Current record or 404 |
//! | `GET`    | `/scores/:subject/:category/history` | Newest-first; optional `?limit=N` |
//! | `DELETE` | `/scores/:subject/:category` | Idempotent forget; always 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use serde::Deserialize;
use tally_core::{
  record::{HistoryEntry, ScoreRecord, validate_pair},
  store::ScoreStore,
};

use crate::error::ApiError;

/// `GET /scores/:subject/:category`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path((subject, category)): Path<(String, String)>,
) -> Result<Json<ScoreRecord>, ApiError>
where
  S: ScoreStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  validate_pair(&subject, &category)?;
  let record = store
    .get_score(&subject, &category)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no score for {subject} in {category}"))
    })?;
  Ok(Json(record))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  /// Truncate to the most recent N entries.
  pub limit: Option<usize>,
}

/// `GET /scores/:subject/:category/history[?limit=N]`
///
/// An unknown pair yields 200 with `[]`, not 404 — "no data" is an answer.
pub async fn history<S>(
  State(store): State<Arc<S>>,
  Path((subject, category)): Path<(String, String)>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError>
where
  S: ScoreStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  validate_pair(&subject, &category)?;
  let entries = store
    .get_history(&subject, &category, params.limit)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(entries))
}

/// `DELETE /scores/:subject/:category` — always 204, even for absent pairs.
pub async fn forget_one<S>(
  State(store): State<Arc<S>>,
  Path((subject, category)): Path<(String, String)>,
) -> Result<StatusCode, ApiError>
where
  S: ScoreStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  validate_pair(&subject, &category)?;
  store
    .forget(&subject, &category)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
