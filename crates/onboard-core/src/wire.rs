//! Field-by-field decoding of JSON objects.
//!
//! Records are decoded from a JSON object one wire name at a time so every
//! failure can name the field it came from. Keys that are never taken are
//! ignored. An explicit `null` counts as absent, except through
//! [`Fields::nullable`], which reports it as a request to clear the field.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
  clock::parse_timestamp,
  error::{Error, Result},
};

static EMAIL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").unwrap());

// RFC 6838 restricted-name characters, optional `;`-separated parameters.
static MEDIA_TYPE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(
    r"^[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*/[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*(\s*;\s*[^;=\s]+=[^;]+)*$",
  )
  .unwrap()
});

pub(crate) fn is_email(s: &str) -> bool { EMAIL.is_match(s) }

pub(crate) fn is_media_type(s: &str) -> bool { MEDIA_TYPE.is_match(s) }

pub(crate) fn is_blank(s: &str) -> bool { s.trim().is_empty() }

/// The remaining fields of a JSON object being decoded.
pub struct Fields(Map<String, Value>);

impl Fields {
  pub fn parse(bytes: &[u8]) -> Result<Self> {
    Self::from_value(serde_json::from_slice(bytes)?)
  }

  pub fn from_value(value: Value) -> Result<Self> {
    match value {
      Value::Object(map) => Ok(Self(map)),
      other => Err(Error::InvalidPayload(format!(
        "expected a JSON object, found {}",
        kind_of(&other)
      ))),
    }
  }

  pub fn optional<T: DeserializeOwned>(
    &mut self,
    field: &'static str,
  ) -> Result<Option<T>> {
    match self.0.remove(field) {
      None | Some(Value::Null) => Ok(None),
      Some(v) => serde_json::from_value(v).map(Some).map_err(|e| {
        Error::InvalidFieldValue {
          field,
          reason: e.to_string(),
        }
      }),
    }
  }

  /// `None` when absent, `Some(None)` for an explicit `null`.
  pub fn nullable<T: DeserializeOwned>(
    &mut self,
    field: &'static str,
  ) -> Result<Option<Option<T>>> {
    match self.0.remove(field) {
      None => Ok(None),
      Some(Value::Null) => Ok(Some(None)),
      Some(v) => serde_json::from_value(v).map(|v| Some(Some(v))).map_err(|e| {
        Error::InvalidFieldValue {
          field,
          reason: e.to_string(),
        }
      }),
    }
  }

  pub fn required<T: DeserializeOwned>(
    &mut self,
    field: &'static str,
  ) -> Result<T> {
    self.optional(field)?.ok_or(Error::MissingField(field))
  }

  pub fn required_timestamp(
    &mut self,
    field: &'static str,
  ) -> Result<NaiveDateTime> {
    let raw: String = self.required(field)?;
    parse_timestamp(&raw).map_err(|e| Error::InvalidFieldValue {
      field,
      reason: format!("{raw:?} is not an ISO-8601 local date-time: {e}"),
    })
  }
}

fn kind_of(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
