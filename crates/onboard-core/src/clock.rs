//! Injectable time source and the wire form of timestamps.
//!
//! Records carry [`NaiveDateTime`] internally and render it as an ISO-8601
//! local date-time without zone, e.g. `2025-01-10T09:00:00`. A fractional
//! part is only emitted when non-zero.

use std::sync::{Mutex, PoisonError};

use chrono::{Local, NaiveDateTime, TimeDelta, Utc};

/// The format used when rendering a timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Minute-precision form, accepted on input only.
const TIMESTAMP_FORMAT_MINUTES: &str = "%Y-%m-%dT%H:%M";

/// A source of "now" for record construction and mutation.
pub trait Clock: Send + Sync {
  fn now(&self) -> NaiveDateTime;
}

/// Wall clock in the host's local time zone, zone information dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
  fn now(&self) -> NaiveDateTime { Local::now().naive_local() }
}

/// Wall clock in UTC, zone information dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtcClock;

impl Clock for UtcClock {
  fn now(&self) -> NaiveDateTime { Utc::now().naive_utc() }
}

/// A clock pinned to an instant. Only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
  instant: Mutex<NaiveDateTime>,
}

impl FixedClock {
  pub fn new(instant: NaiveDateTime) -> Self {
    Self {
      instant: Mutex::new(instant),
    }
  }

  /// Pin the clock from its wire form, e.g. `2025-01-01T00:00:00`.
  pub fn at(s: &str) -> Result<Self, chrono::ParseError> {
    parse_timestamp(s).map(Self::new)
  }

  pub fn set(&self, instant: NaiveDateTime) {
    *self.instant.lock().unwrap_or_else(PoisonError::into_inner) = instant;
  }

  pub fn advance(&self, by: TimeDelta) {
    let mut guard = self.instant.lock().unwrap_or_else(PoisonError::into_inner);
    *guard += by;
  }
}

impl Clock for FixedClock {
  fn now(&self) -> NaiveDateTime {
    *self.instant.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
  ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
  NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).or_else(|e| {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT_MINUTES).map_err(|_| e)
  })
}

/// `#[serde(serialize_with = "...")]` adapter for timestamp fields.
pub(crate) mod serde_timestamp {
  use chrono::NaiveDateTime;
  use serde::Serializer;

  pub fn serialize<S: Serializer>(
    ts: &NaiveDateTime,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.format(super::TIMESTAMP_FORMAT))
  }
}
