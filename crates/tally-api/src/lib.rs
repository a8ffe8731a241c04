//! JSON HTTP API for Tally.
//!
//! Exposes an axum [`Router`] backed by any [`tally_core::store::ScoreStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility — the
//! chat gateway in front of this API does its own admin checks.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tally_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod leaderboard;
pub mod observations;
pub mod scores;
pub mod transfer;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tally_core::store::ScoreStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ScoreStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Observations (the only write path)
    .route("/observations", post(observations::create::<S>))
    // Scores
    .route(
      "/scores/{subject}/{category}",
      get(scores::get_one::<S>).delete(scores::forget_one::<S>),
    )
    .route(
      "/scores/{subject}/{category}/history",
      get(scores::history::<S>),
    )
    // Leaderboard
    .route("/leaderboard/{category}", get(leaderboard::handler::<S>))
    // Bulk transfer
    .route("/export", get(transfer::export::<S>))
    .route("/import", post(transfer::import::<S>))
    .with_state(store)
}
