//! Encoding and decoding between records and `records` table rows.
//!
//! The body column holds the record's wire JSON verbatim, so a row can be
//! handed to any collaborator that speaks the wire format. The key and status
//! columns are copies of body fields used for lookups.

use onboard_core::{
  document::Document,
  employee::Employee,
  keys::RecordKey,
};

use crate::Result;

pub const EMPLOYEE: &str = "employee";
pub const DOCUMENT: &str = "document";

/// Column values for one row of the `records` table.
pub struct RawRecord {
  pub partition_key: String,
  pub sort_key:      String,
  pub record_type:   &'static str,
  pub status:        String,
  pub body:          String,
}

impl RawRecord {
  pub fn from_employee(e: &Employee) -> Result<Self> {
    let RecordKey { partition, sort } = e.key();
    Ok(Self {
      partition_key: partition,
      sort_key:      sort,
      record_type:   EMPLOYEE,
      status:        e.status().to_string(),
      body:          e.to_json()?,
    })
  }

  pub fn from_document(d: &Document) -> Result<Self> {
    let RecordKey { partition, sort } = d.key();
    Ok(Self {
      partition_key: partition,
      sort_key:      sort,
      record_type:   DOCUMENT,
      status:        d.status().to_string(),
      body:          d.to_json()?,
    })
  }
}

pub fn decode_employee(body: &str) -> Result<Employee> {
  Ok(Employee::from_json(body.as_bytes())?)
}

pub fn decode_document(body: &str) -> Result<Document> {
  Ok(Document::from_json(body.as_bytes())?)
}
