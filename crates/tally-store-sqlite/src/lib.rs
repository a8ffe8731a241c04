//! SQLite backend for the Tally score ledger.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. That single-connection design
//! also serialises every write, which is how the per-pair ordering contract
//! of [`tally_core::store::ScoreStore`] is met.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
