//! The uploaded-document metadata record.
//!
//! A document row lives in its employee's partition under its own
//! `document_id` as sort key. The blob itself sits in external storage,
//! addressed by `s3_key`; only `status` changes after construction.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  clock::{Clock, serde_timestamp},
  error::{Error, Result, Violation},
  keys::{DocumentId, EmployeeId, PROFILE_SORT_KEY, RecordKey},
  wire::{self, Fields},
};

// ─── Enumerations ────────────────────────────────────────────────────────────

/// What kind of paperwork a document is.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentType {
  /// Proof of identity.
  Id,
  Contract,
  Tax,
  Other,
}

/// Verification state of a document.
///
/// ```text
/// uploaded ──verify──> verified
/// uploaded ──reject──> rejected
/// ```
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentStatus {
  #[default]
  Uploaded,
  Verified,
  Rejected,
}

impl DocumentStatus {
  pub fn can_transition_to(self, next: Self) -> bool {
    matches!((self, next), (Self::Uploaded, Self::Verified | Self::Rejected))
  }

  pub fn is_terminal(self) -> bool { !matches!(self, Self::Uploaded) }
}

// ─── NewDocument ─────────────────────────────────────────────────────────────

/// Caller-supplied fields for [`Document::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
  pub employee_id:   EmployeeId,
  pub document_id:   DocumentId,
  pub document_type: DocumentType,
  pub file_name:     String,
  pub s3_key:        String,
  pub file_size:     i64,
  pub content_type:  String,
}

impl NewDocument {
  pub fn from_value(value: serde_json::Value) -> Result<Self> {
    let mut f = Fields::from_value(value)?;
    Ok(Self {
      employee_id:   f.required("employee_id")?,
      document_id:   f.required("document_id")?,
      document_type: f.required("document_type")?,
      file_name:     f.required("file_name")?,
      s3_key:        f.required("s3_key")?,
      file_size:     f.required("file_size")?,
      content_type:  f.required("content_type")?,
    })
  }
}

impl<'de> Deserialize<'de> for NewDocument {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Self::from_value(value).map_err(serde::de::Error::custom)
  }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// Metadata for one uploaded document belonging to an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
  employee_id:   EmployeeId,
  document_id:   DocumentId,
  document_type: DocumentType,
  file_name:     String,
  s3_key:        String,
  #[serde(serialize_with = "serde_timestamp::serialize")]
  upload_date:   NaiveDateTime,
  status:        DocumentStatus,
  /// Bytes. Signed so that a negative value survives decoding and is
  /// reported by [`Document::validate`].
  file_size:     i64,
  content_type:  String,
}

impl Document {
  /// A fresh record: status `uploaded`, `upload_date` set to `clock.now()`.
  pub fn create(input: NewDocument, clock: &dyn Clock) -> Self {
    Self {
      employee_id:   input.employee_id,
      document_id:   input.document_id,
      document_type: input.document_type,
      file_name:     input.file_name,
      s3_key:        input.s3_key,
      upload_date:   clock.now(),
      status:        DocumentStatus::default(),
      file_size:     input.file_size,
      content_type:  input.content_type,
    }
  }

  pub fn from_json(bytes: &[u8]) -> Result<Self> {
    Self::from_fields(Fields::parse(bytes)?)
  }

  pub fn from_value(value: serde_json::Value) -> Result<Self> {
    Self::from_fields(Fields::from_value(value)?)
  }

  fn from_fields(mut f: Fields) -> Result<Self> {
    Ok(Self {
      employee_id:   f.required("employee_id")?,
      document_id:   f.required("document_id")?,
      document_type: f.required("document_type")?,
      file_name:     f.required("file_name")?,
      s3_key:        f.required("s3_key")?,
      upload_date:   f.required_timestamp("upload_date")?,
      status:        f.required("status")?,
      file_size:     f.required("file_size")?,
      content_type:  f.required("content_type")?,
    })
  }

  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  pub fn to_value(&self) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(self)?)
  }

  /// Check the record's invariants, collecting every violation.
  pub fn validate(&self) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    let required = [
      ("employee_id", self.employee_id.as_str()),
      ("document_id", self.document_id.as_str()),
      ("file_name", self.file_name.as_str()),
      ("s3_key", self.s3_key.as_str()),
      ("content_type", self.content_type.as_str()),
    ];
    for (field, value) in required {
      if wire::is_blank(value) {
        violations.push(Violation::MissingField { field });
      }
    }

    if self.document_id.as_str() == PROFILE_SORT_KEY {
      violations.push(Violation::invalid(
        "document_id",
        format!("{PROFILE_SORT_KEY:?} is reserved for the profile row"),
      ));
    }
    if self.file_size < 0 {
      violations.push(Violation::invalid(
        "file_size",
        format!("must be non-negative, got {}", self.file_size),
      ));
    }
    if !wire::is_blank(&self.content_type)
      && !wire::is_media_type(&self.content_type)
    {
      violations.push(Violation::invalid(
        "content_type",
        format!("{:?} is not a type/subtype media type", self.content_type),
      ));
    }

    if violations.is_empty() {
      Ok(())
    } else {
      Err(violations)
    }
  }

  /// Move to `next` if the verification workflow allows it.
  pub fn transition(&mut self, next: DocumentStatus) -> Result<()> {
    if !self.status.can_transition_to(next) {
      return Err(Error::InvalidTransition {
        field: "status",
        from:  self.status.to_string(),
        to:    next.to_string(),
      });
    }
    self.status = next;
    Ok(())
  }

  pub fn verify(&mut self) -> Result<()> {
    self.transition(DocumentStatus::Verified)
  }

  pub fn reject(&mut self) -> Result<()> {
    self.transition(DocumentStatus::Rejected)
  }

  pub fn key(&self) -> RecordKey {
    RecordKey::document(&self.employee_id, &self.document_id)
  }

  pub fn employee_id(&self) -> &EmployeeId { &self.employee_id }

  pub fn document_id(&self) -> &DocumentId { &self.document_id }

  pub fn document_type(&self) -> DocumentType { self.document_type }

  pub fn file_name(&self) -> &str { &self.file_name }

  pub fn s3_key(&self) -> &str { &self.s3_key }

  pub fn upload_date(&self) -> NaiveDateTime { self.upload_date }

  pub fn status(&self) -> DocumentStatus { self.status }

  pub fn file_size(&self) -> i64 { self.file_size }

  pub fn content_type(&self) -> &str { &self.content_type }
}

impl<'de> Deserialize<'de> for Document {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Self::from_value(value).map_err(serde::de::Error::custom)
  }
}
