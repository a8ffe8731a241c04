//! Handler for `POST /observations` — the ledger's single write path.

use std::sync::Arc;

use axum::{Json, extract::State};
use tally_core::{
  record::{NewObservation, UpdateOutcome},
  store::ScoreStore,
};

use crate::error::ApiError;

/// `POST /observations` — body `{subject, category, value}`.
///
/// Always 200 with the serialised [`UpdateOutcome`]: rejection is an
/// expected outcome the caller branches on, not an error status.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewObservation>,
) -> Result<Json<UpdateOutcome>, ApiError>
where
  S: ScoreStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  body.validate()?;
  let outcome = store
    .record_observation(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(outcome))
}
