//! Handlers for bulk import and export.
//!
//! The wire format is the `subject,category,value` row text of
//! [`tally_tabular`]; the chat layer forwards file attachments here as-is.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::header,
  response::IntoResponse,
};
use serde::Deserialize;
use tally_core::store::ScoreStore;
use tally_tabular::{ImportSummary, import_rows, records_to_csv, snapshot_to_csv};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ExportParams {
  /// Restrict the export to one category's ranked snapshot.
  pub category: Option<String>,
}

/// `GET /export[?category=...]` — `text/csv`, header row included.
pub async fn export<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ExportParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ScoreStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let csv = match params.category {
    Some(category) => {
      let ranked = store
        .ranked_snapshot(&category, None)
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?;
      snapshot_to_csv(&category, &ranked)
    }
    None => {
      let records = store
        .list_records()
        .await
        .map_err(|e| ApiError::Store(Box::new(e)))?;
      records_to_csv(&records)
    }
  };

  Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv))
}

/// `POST /import` — body is row text; returns the accepted/rejected/failed
/// summary. Row-level problems never fail the request.
pub async fn import<S>(
  State(store): State<Arc<S>>,
  body: String,
) -> Result<Json<ImportSummary>, ApiError>
where
  S: ScoreStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let summary = import_rows(store.as_ref(), &body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(summary))
}
