//! Core records and trait definitions for the onboarding backend.
//!
//! No HTTP or database dependencies live here, and nothing in this crate
//! logs. The records are passive values: every operation is synchronous
//! and reports failure as an [`Error`] or a list of [`Violation`]s.

pub mod clock;
pub mod document;
pub mod employee;
pub mod error;
pub mod keys;
pub mod store;
pub mod wire;

pub use error::{Error, Result, Violation};

#[cfg(test)]
mod proptests;
