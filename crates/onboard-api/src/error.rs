//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use onboard_core::{
  Violation,
  store::{StoreError, StoreErrorKind},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// The body was missing fields, held values of the wrong shape, or broke
  /// one or more invariants.
  #[error("validation failed with {} violation(s)", .0.len())]
  Invalid(Vec<Violation>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Classify a backend error by its [`StoreErrorKind`].
  pub fn store<E: StoreError>(e: E) -> Self {
    match e.kind() {
      StoreErrorKind::NotFound | StoreErrorKind::MissingParent => {
        Self::NotFound(e.to_string())
      }
      StoreErrorKind::Conflict => Self::Conflict(e.to_string()),
      StoreErrorKind::Other => Self::Store(Box::new(e)),
    }
  }
}

impl From<onboard_core::Error> for ApiError {
  fn from(e: onboard_core::Error) -> Self {
    use onboard_core::Error as E;
    match e {
      E::InvalidTransition { .. } => Self::Conflict(e.to_string()),
      E::MissingField(field) => {
        Self::Invalid(vec![Violation::MissingField { field }])
      }
      E::InvalidFieldValue { field, reason } => {
        Self::Invalid(vec![Violation::invalid(field, reason)])
      }
      E::InvalidPayload(m) => Self::BadRequest(m),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self { Self::BadRequest(e.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, json!({ "error": m }))
      }
      ApiError::Conflict(m) => (StatusCode::CONFLICT, json!({ "error": m })),
      ApiError::Invalid(violations) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({ "error": self.to_string(), "violations": violations }),
      ),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          json!({ "error": e.to_string() }),
        )
      }
    };
    (status, Json(body)).into_response()
  }
}
