//! SQLite backend for the onboarding store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Rows are laid out the way a
//! wide-column key-value store would hold them: one table keyed by
//! `(partition_key, sort_key)`, with each record's wire JSON as the body.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
