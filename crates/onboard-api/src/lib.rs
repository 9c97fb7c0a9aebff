//! JSON REST API for the onboarding backend.
//!
//! Exposes an axum [`Router`] backed by any
//! [`onboard_core::store::OnboardingStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", onboard_api::api_router(state))
//! ```

pub mod documents;
pub mod employees;
pub mod error;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use onboard_core::{clock::Clock, store::OnboardingStore};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<S> {
  pub store: Arc<S>,
  /// Source of `created_at`, `updated_at` and `upload_date` values.
  pub clock: Arc<dyn Clock>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      clock: Arc::clone(&self.clock),
    }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: OnboardingStore + 'static,
{
  Router::new()
    // Employees
    .route(
      "/employees",
      get(employees::list::<S>).post(employees::create::<S>),
    )
    .route(
      "/employees/{employee_id}",
      get(employees::get_one::<S>).patch(employees::update::<S>),
    )
    // Documents
    .route(
      "/employees/{employee_id}/documents",
      get(documents::list::<S>).post(documents::create::<S>),
    )
    .route(
      "/employees/{employee_id}/documents/{document_id}",
      get(documents::get_one::<S>),
    )
    .route(
      "/employees/{employee_id}/documents/{document_id}/verify",
      post(documents::verify::<S>),
    )
    .route(
      "/employees/{employee_id}/documents/{document_id}/reject",
      post(documents::reject::<S>),
    )
    .with_state(state)
}
