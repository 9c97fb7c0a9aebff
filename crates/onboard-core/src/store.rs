//! The `OnboardingStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `onboard-store-sqlite`).
//! The HTTP layer (`onboard-api`) depends on this abstraction, not on any
//! concrete backend.
//!
//! Backends key every row by `(employee_id, sort_key)`: the profile row uses
//! the sort key `PROFILE`, and document rows use their `document_id`.
//!
//! Updates are conditional on the status the caller read. A write whose
//! expected status no longer matches the stored row fails with an error of
//! kind [`StoreErrorKind::Conflict`] and changes nothing.

use std::future::Future;

use crate::{
  document::{Document, DocumentStatus},
  employee::{Employee, EmployeeStatus},
  keys::{DocumentId, EmployeeId},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// How a store failure should be reported to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
  /// The addressed row does not exist.
  NotFound,
  /// The key is already taken, or the row changed since it was read.
  Conflict,
  /// A document names an employee with no profile row.
  MissingParent,
  Other,
}

/// Error type of an [`OnboardingStore`] backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> StoreErrorKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Persistence for employee profiles and their documents. Every method
/// returns a `Send` future.
pub trait OnboardingStore: Send + Sync {
  type Error: StoreError;

  // ── Employees ─────────────────────────────────────────────────────────

  /// Persist a new profile row. Fails if one already exists for the
  /// employee.
  fn insert_employee<'a>(
    &'a self,
    employee: &'a Employee,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Retrieve a profile by employee ID. Returns `None` if not found.
  fn get_employee<'a>(
    &'a self,
    id: &'a EmployeeId,
  ) -> impl Future<Output = Result<Option<Employee>, Self::Error>> + Send + 'a;

  /// List all profiles, optionally filtered by status.
  fn list_employees(
    &self,
    status: Option<EmployeeStatus>,
  ) -> impl Future<Output = Result<Vec<Employee>, Self::Error>> + Send + '_;

  /// Overwrite an existing profile row whose stored status is still
  /// `expected`. Fails if the row does not exist or its status moved.
  fn update_employee<'a>(
    &'a self,
    employee: &'a Employee,
    expected: EmployeeStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Persist a new document row.
  ///
  /// Fails if the referenced employee has no profile row, or if the
  /// `(employee_id, document_id)` pair is already taken.
  fn insert_document<'a>(
    &'a self,
    document: &'a Document,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn get_document<'a>(
    &'a self,
    employee_id: &'a EmployeeId,
    document_id: &'a DocumentId,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + 'a;

  /// All documents in an employee's partition, ordered by `document_id`.
  fn list_documents<'a>(
    &'a self,
    employee_id: &'a EmployeeId,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + 'a;

  /// Overwrite an existing document row whose stored status is still
  /// `expected`. Fails if the row does not exist or its status moved.
  fn update_document<'a>(
    &'a self,
    document: &'a Document,
    expected: DocumentStatus,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
