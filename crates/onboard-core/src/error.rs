//! Error types for `onboard-core`.

use serde::Serialize;
use thiserror::Error;

/// A failure surfaced while decoding a record or changing its state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// The input is not a JSON object, or not JSON at all.
  #[error("invalid payload: {0}")]
  InvalidPayload(String),

  #[error("missing required field `{0}`")]
  MissingField(&'static str),

  #[error("invalid value for `{field}`: {reason}")]
  InvalidFieldValue { field: &'static str, reason: String },

  #[error("`{field}` cannot move from {from} to {to}")]
  InvalidTransition {
    field: &'static str,
    from:  String,
    to:    String,
  },
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self { Self::InvalidPayload(e.to_string()) }
}

/// One broken invariant reported by `validate`, naming the offending wire
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
  #[error("missing required field `{field}`")]
  MissingField { field: &'static str },

  #[error("invalid value for `{field}`: {reason}")]
  InvalidFieldValue { field: &'static str, reason: String },
}

impl Violation {
  pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
    Self::InvalidFieldValue {
      field,
      reason: reason.into(),
    }
  }

  /// The wire name of the field this violation refers to.
  pub fn field(&self) -> &'static str {
    match self {
      Self::MissingField { field } | Self::InvalidFieldValue { field, .. } => {
        field
      }
    }
  }
}

impl From<Violation> for Error {
  fn from(v: Violation) -> Self {
    match v {
      Violation::MissingField { field } => Self::MissingField(field),
      Violation::InvalidFieldValue { field, reason } => {
        Self::InvalidFieldValue { field, reason }
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
