//! Bulk import — one `record_observation` per parsed row.

use serde::{Deserialize, Serialize};
use tally_core::store::ScoreStore;

use crate::parse::parse_rows;

/// Counts for the caller's summary reply.
///
/// `rejected` rows are ordinary ratchet rejections (value not greater than
/// the stored one); `failed` rows never reached the store (malformed line,
/// bad value, empty identifier).
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct ImportSummary {
  pub accepted: usize,
  pub rejected: usize,
  pub failed:   usize,
}

/// Parse `input` and apply every well-formed row to `store` in input order.
///
/// Row-level problems are tallied into `failed`; a store error aborts the
/// import (rows already applied stay applied — each row is its own
/// transaction, exactly as if the caller had issued them one by one).
pub async fn import_rows<S: ScoreStore>(
  store: &S,
  input: &str,
) -> Result<ImportSummary, S::Error> {
  let parsed = parse_rows(input);

  let mut summary = ImportSummary { failed: parsed.errors.len(), ..Default::default() };
  for row in parsed.rows {
    if store.record_observation(row).await?.is_accepted() {
      summary.accepted += 1;
    } else {
      summary.rejected += 1;
    }
  }
  Ok(summary)
}
