//! Error type for `onboard-store-sqlite`.

use onboard_core::{
  keys::{DocumentId, EmployeeId, RecordKey},
  store::{StoreError, StoreErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A stored body failed to decode, or a record failed to encode.
  #[error("core error: {0}")]
  Core(#[from] onboard_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("employee not found: {0}")]
  EmployeeNotFound(EmployeeId),

  /// A document was inserted for an employee with no profile row.
  #[error("no profile row for employee {0}")]
  MissingEmployee(EmployeeId),

  #[error("employee {0} already exists")]
  EmployeeExists(EmployeeId),

  #[error("document {document_id} not found for employee {employee_id}")]
  DocumentNotFound {
    employee_id: EmployeeId,
    document_id: DocumentId,
  },

  #[error("document {document_id} already exists for employee {employee_id}")]
  DocumentExists {
    employee_id: EmployeeId,
    document_id: DocumentId,
  },

  /// The document ID collides with the profile row's sort key.
  #[error("document ID {0} is reserved")]
  ReservedSortKey(DocumentId),

  /// The row's status moved after it was read.
  #[error(
    "record ({}, {}) is no longer {expected}, found {found}",
    .key.partition,
    .key.sort
  )]
  StaleWrite {
    key:      RecordKey,
    expected: String,
    found:    String,
  },
}

impl StoreError for Error {
  fn kind(&self) -> StoreErrorKind {
    match self {
      Self::EmployeeNotFound(_) | Self::DocumentNotFound { .. } => {
        StoreErrorKind::NotFound
      }
      Self::EmployeeExists(_)
      | Self::DocumentExists { .. }
      | Self::ReservedSortKey(_)
      | Self::StaleWrite { .. } => StoreErrorKind::Conflict,
      Self::MissingEmployee(_) => StoreErrorKind::MissingParent,
      Self::Core(_) | Self::Database(_) => StoreErrorKind::Other,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
