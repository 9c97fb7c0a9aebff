//! Identifiers and the two-part key layout of the document store.
//!
//! Every row lives in the partition named by its `employee_id`. Within a
//! partition the profile row uses the fixed sort key [`PROFILE_SORT_KEY`] and
//! each document row uses its `document_id`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sort key of the single profile row in an employee's partition.
pub const PROFILE_SORT_KEY: &str = "PROFILE";

/// Caller-assigned employee identifier. Opaque to this crate.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

/// Caller-assigned document identifier, unique within one employee.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DocumentId(pub String);

macro_rules! string_id {
  ($ty:ty) => {
    impl $ty {
      pub fn as_str(&self) -> &str { &self.0 }
    }

    impl fmt::Display for $ty {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }

    impl From<&str> for $ty {
      fn from(s: &str) -> Self { Self(s.to_owned()) }
    }

    impl From<String> for $ty {
      fn from(s: String) -> Self { Self(s) }
    }
  };
}

string_id!(EmployeeId);
string_id!(DocumentId);

/// The `(partition, sort)` primary key of a stored row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
  pub partition: String,
  pub sort:      String,
}

impl RecordKey {
  pub fn profile(employee_id: &EmployeeId) -> Self {
    Self {
      partition: employee_id.0.clone(),
      sort:      PROFILE_SORT_KEY.to_owned(),
    }
  }

  pub fn document(employee_id: &EmployeeId, document_id: &DocumentId) -> Self {
    Self {
      partition: employee_id.0.clone(),
      sort:      document_id.0.clone(),
    }
  }
}

/// The conventional blob key for an uploaded document:
/// `employees/{employee_id}/{document_id}/{file_name}`.
pub fn default_blob_key(
  employee_id: &EmployeeId,
  document_id: &DocumentId,
  file_name: &str,
) -> String {
  format!("employees/{employee_id}/{document_id}/{file_name}")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn profile_and_document_rows_share_a_partition() {
    let emp = EmployeeId::from("E-000123");
    let profile = RecordKey::profile(&emp);
    let doc = RecordKey::document(&emp, &DocumentId::from("D-1"));
    assert_eq!(profile.partition, doc.partition);
    assert_eq!(profile.sort, "PROFILE");
    assert_eq!(doc.sort, "D-1");
  }

  #[test]
  fn blob_key_follows_convention() {
    let key = default_blob_key(
      &EmployeeId::from("E-000123"),
      &DocumentId::from("D-1"),
      "contract.pdf",
    );
    assert_eq!(key, "employees/E-000123/D-1/contract.pdf");
  }

  #[test]
  fn ids_serialize_as_bare_strings() {
    let json = serde_json::to_string(&EmployeeId::from("E-1")).unwrap();
    assert_eq!(json, "\"E-1\"");
  }
}
