//! The employee profile record.
//!
//! One profile row exists per employee, stored under the fixed sort key
//! `PROFILE` in the employee's partition. Identity fields and `created_at`
//! are fixed at construction; profile edits and status changes go through
//! [`Employee::apply`] and [`Employee::transition`], which refresh
//! `updated_at`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumString};

use crate::{
  clock::{Clock, serde_timestamp},
  error::{Error, Result, Violation},
  keys::{EmployeeId, PROFILE_SORT_KEY, RecordKey},
  wire::{self, Fields},
};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Where an employee is in the onboarding process.
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
pub enum EmployeeStatus {
  #[default]
  Pending,
  Active,
  Terminated,
}

impl EmployeeStatus {
  pub fn can_transition_to(self, next: Self) -> bool {
    use EmployeeStatus::*;
    matches!(
      (self, next),
      (Pending, Active) | (Pending, Terminated) | (Active, Terminated)
    )
  }

  pub fn is_terminal(self) -> bool { matches!(self, Self::Terminated) }
}

// ─── Sort key ────────────────────────────────────────────────────────────────

/// Stand-in for the `sort_key` attribute, which is always `PROFILE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct ProfileSortKey;

impl Serialize for ProfileSortKey {
  fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(PROFILE_SORT_KEY)
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Caller-supplied fields for [`Employee::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
  pub employee_id: EmployeeId,
  pub name:        String,
  pub email:       String,
  pub department:  Option<String>,
  pub start_date:  Option<NaiveDate>,
}

impl NewEmployee {
  /// Convenience constructor with the optional fields unset.
  pub fn new(
    employee_id: impl Into<EmployeeId>,
    name: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      employee_id: employee_id.into(),
      name:        name.into(),
      email:       email.into(),
      department:  None,
      start_date:  None,
    }
  }

  pub fn from_value(value: serde_json::Value) -> Result<Self> {
    let mut f = Fields::from_value(value)?;
    Ok(Self {
      employee_id: f.required("employee_id")?,
      name:        f.required("name")?,
      email:       f.required("email")?,
      department:  f.optional("department")?,
      start_date:  f.optional("start_date")?,
    })
  }
}

impl<'de> Deserialize<'de> for NewEmployee {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Self::from_value(value).map_err(serde::de::Error::custom)
  }
}

/// A partial profile edit.
///
/// `name` and `email` overwrite when `Some`. The optional profile fields
/// take three states: `None` leaves the value alone, `Some(None)` clears it
/// and `Some(Some(_))` overwrites it. On the wire an explicit `null` clears.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeUpdate {
  pub name:       Option<String>,
  pub email:      Option<String>,
  pub department: Option<Option<String>>,
  pub start_date: Option<Option<NaiveDate>>,
}

impl EmployeeUpdate {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.email.is_none()
      && self.department.is_none()
      && self.start_date.is_none()
  }

  /// Take the edit's fields out of `f`, leaving any others in place.
  pub fn from_fields(f: &mut Fields) -> Result<Self> {
    Ok(Self {
      name:       f.optional("name")?,
      email:      f.optional("email")?,
      department: f.nullable("department")?,
      start_date: f.nullable("start_date")?,
    })
  }

  pub fn from_value(value: serde_json::Value) -> Result<Self> {
    Self::from_fields(&mut Fields::from_value(value)?)
  }
}

impl<'de> Deserialize<'de> for EmployeeUpdate {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Self::from_value(value).map_err(serde::de::Error::custom)
  }
}

// ─── Employee ────────────────────────────────────────────────────────────────

/// The onboarding profile of one person.
///
/// Serializes with the wire names verbatim. Unset optional fields are
/// omitted rather than written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
  employee_id: EmployeeId,
  sort_key:    ProfileSortKey,
  name:        String,
  email:       String,
  #[serde(skip_serializing_if = "Option::is_none")]
  department:  Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  start_date:  Option<NaiveDate>,
  status:      EmployeeStatus,
  #[serde(serialize_with = "serde_timestamp::serialize")]
  created_at:  NaiveDateTime,
  #[serde(serialize_with = "serde_timestamp::serialize")]
  updated_at:  NaiveDateTime,
}

impl Employee {
  /// A fresh profile: status `pending`, both timestamps set to `clock.now()`.
  pub fn create(input: NewEmployee, clock: &dyn Clock) -> Self {
    let now = clock.now();
    Self {
      employee_id: input.employee_id,
      sort_key:    ProfileSortKey,
      name:        input.name,
      email:       input.email,
      department:  input.department,
      start_date:  input.start_date,
      status:      EmployeeStatus::default(),
      created_at:  now,
      updated_at:  now,
    }
  }

  /// Decode from JSON bytes. Timestamps are taken as given.
  pub fn from_json(bytes: &[u8]) -> Result<Self> {
    Self::from_fields(Fields::parse(bytes)?)
  }

  pub fn from_value(value: serde_json::Value) -> Result<Self> {
    Self::from_fields(Fields::from_value(value)?)
  }

  fn from_fields(mut f: Fields) -> Result<Self> {
    let employee_id = f.required("employee_id")?;
    let sort_key: String = f.required("sort_key")?;
    if sort_key != PROFILE_SORT_KEY {
      return Err(Error::InvalidFieldValue {
        field:  "sort_key",
        reason: format!("expected {PROFILE_SORT_KEY:?}, found {sort_key:?}"),
      });
    }

    Ok(Self {
      employee_id,
      sort_key: ProfileSortKey,
      name: f.required("name")?,
      email: f.required("email")?,
      department: f.optional("department")?,
      start_date: f.optional("start_date")?,
      status: f.required("status")?,
      created_at: f.required_timestamp("created_at")?,
      updated_at: f.required_timestamp("updated_at")?,
    })
  }

  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }

  pub fn to_value(&self) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(self)?)
  }

  /// Check the record's invariants, collecting every violation.
  pub fn validate(&self) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    if wire::is_blank(self.employee_id.as_str()) {
      violations.push(Violation::MissingField { field: "employee_id" });
    }
    if wire::is_blank(&self.name) {
      violations.push(Violation::MissingField { field: "name" });
    }
    if wire::is_blank(&self.email) {
      violations.push(Violation::MissingField { field: "email" });
    } else if !wire::is_email(&self.email) {
      violations.push(Violation::invalid(
        "email",
        format!("{:?} is not an email address", self.email),
      ));
    }
    if self.created_at > self.updated_at {
      violations.push(Violation::invalid(
        "updated_at",
        "must not precede created_at",
      ));
    }

    if violations.is_empty() {
      Ok(())
    } else {
      Err(violations)
    }
  }

  /// Apply a profile edit. Returns `false`, leaving `updated_at` alone, when
  /// the edit changes nothing.
  pub fn apply(&mut self, update: EmployeeUpdate, clock: &dyn Clock) -> bool {
    let mut changed = false;

    if let Some(name) = update.name
      && name != self.name
    {
      self.name = name;
      changed = true;
    }
    if let Some(email) = update.email
      && email != self.email
    {
      self.email = email;
      changed = true;
    }
    if let Some(department) = update.department
      && department != self.department
    {
      self.department = department;
      changed = true;
    }
    if let Some(start_date) = update.start_date
      && start_date != self.start_date
    {
      self.start_date = start_date;
      changed = true;
    }

    if changed {
      self.touch(clock);
    }
    changed
  }

  /// Move to `next`, refreshing `updated_at`.
  pub fn transition(
    &mut self,
    next: EmployeeStatus,
    clock: &dyn Clock,
  ) -> Result<()> {
    if !self.status.can_transition_to(next) {
      return Err(Error::InvalidTransition {
        field: "status",
        from:  self.status.to_string(),
        to:    next.to_string(),
      });
    }
    self.status = next;
    self.touch(clock);
    Ok(())
  }

  // Never moves backwards, so `created_at <= updated_at` survives a clock
  // that steps back.
  fn touch(&mut self, clock: &dyn Clock) {
    self.updated_at = clock.now().max(self.updated_at);
  }

  pub fn key(&self) -> RecordKey { RecordKey::profile(&self.employee_id) }

  pub fn employee_id(&self) -> &EmployeeId { &self.employee_id }

  pub fn sort_key(&self) -> &'static str { PROFILE_SORT_KEY }

  pub fn name(&self) -> &str { &self.name }

  pub fn email(&self) -> &str { &self.email }

  pub fn department(&self) -> Option<&str> { self.department.as_deref() }

  pub fn start_date(&self) -> Option<NaiveDate> { self.start_date }

  pub fn status(&self) -> EmployeeStatus { self.status }

  pub fn created_at(&self) -> NaiveDateTime { self.created_at }

  pub fn updated_at(&self) -> NaiveDateTime { self.updated_at }
}

impl<'de> Deserialize<'de> for Employee {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Self::from_value(value).map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeDelta;
  use serde_json::json;

  use super::*;
  use crate::clock::FixedClock;

  fn clock() -> FixedClock { FixedClock::at("2025-01-01T00:00:00").unwrap() }

  fn canonical() -> serde_json::Value {
    json!({
      "employee_id": "E-000123",
      "sort_key": "PROFILE",
      "name": "Alice Example",
      "email": "alice@example.com",
      "department": "Engineering",
      "start_date": "2025-01-13",
      "status": "pending",
      "created_at": "2025-01-10T09:00:00",
      "updated_at": "2025-01-10T09:00:00"
    })
  }

  #[test]
  fn fresh_profile_defaults() {
    let e = Employee::create(NewEmployee::new("E-1", "A", "a@x.y"), &clock());
    assert_eq!(e.sort_key(), "PROFILE");
    assert_eq!(e.status(), EmployeeStatus::Pending);
    assert_eq!(e.created_at(), e.updated_at());
    assert_eq!(e.department(), None);
    assert_eq!(e.start_date(), None);
  }

  #[test]
  fn serialize_fresh_profile() {
    let e = Employee::create(NewEmployee::new("E-1", "A", "a@x.y"), &clock());
    let out = e.to_json().unwrap();
    assert!(out.contains(r#""sort_key":"PROFILE""#), "{out}");
    assert!(out.contains(r#""status":"pending""#), "{out}");
    assert!(out.contains(r#""created_at":"2025-01-01T00:00:00""#), "{out}");
    assert!(out.contains(r#""updated_at":"2025-01-01T00:00:00""#), "{out}");
    assert!(out.contains(r#""employee_id":"E-1""#), "{out}");
  }

  #[test]
  fn unset_optionals_are_omitted() {
    let e = Employee::create(NewEmployee::new("E-1", "A", "a@x.y"), &clock());
    let v = e.to_value().unwrap();
    let obj = v.as_object().unwrap();
    assert!(!obj.contains_key("department"));
    assert!(!obj.contains_key("start_date"));
    assert_eq!(obj.len(), 7);
  }

  #[test]
  fn deserialize_canonical_document() {
    let bytes = serde_json::to_vec(&canonical()).unwrap();
    let e = Employee::from_json(&bytes).unwrap();
    assert_eq!(e.validate(), Ok(()));
    assert_eq!(e.employee_id().as_str(), "E-000123");
    assert_eq!(e.status(), EmployeeStatus::Pending);
    assert_eq!(e.department(), Some("Engineering"));
    assert_eq!(e.start_date(), NaiveDate::from_ymd_opt(2025, 1, 13));
    assert_eq!(e.to_value().unwrap(), canonical());
  }

  #[test]
  fn missing_email_is_reported_on_decode() {
    let mut doc = canonical();
    doc.as_object_mut().unwrap().remove("email");
    assert_eq!(Employee::from_value(doc), Err(Error::MissingField("email")));
  }

  #[test]
  fn wrong_sort_key_is_rejected() {
    let mut doc = canonical();
    doc["sort_key"] = json!("D-1");
    assert!(matches!(
      Employee::from_value(doc),
      Err(Error::InvalidFieldValue { field: "sort_key", .. })
    ));
  }

  #[test]
  fn unknown_status_is_rejected() {
    let mut doc = canonical();
    doc["status"] = json!("onboarding");
    assert!(matches!(
      Employee::from_value(doc),
      Err(Error::InvalidFieldValue { field: "status", .. })
    ));
  }

  #[test]
  fn unknown_fields_are_ignored() {
    let mut doc = canonical();
    doc["manager"] = json!("Bob");
    let e = Employee::from_value(doc).unwrap();
    assert_eq!(e.to_value().unwrap(), canonical());
  }

  #[test]
  fn serde_deserialize_matches_from_value() {
    let via_serde: Employee = serde_json::from_value(canonical()).unwrap();
    assert_eq!(via_serde, Employee::from_value(canonical()).unwrap());

    let mut doc = canonical();
    doc.as_object_mut().unwrap().remove("name");
    let err = serde_json::from_value::<Employee>(doc).unwrap_err();
    assert!(err.to_string().contains("`name`"), "{err}");
  }

  #[test]
  fn validate_collects_every_violation() {
    let mut doc = canonical();
    doc["name"] = json!("  ");
    doc["email"] = json!("not-an-email");
    doc["created_at"] = json!("2025-01-11T00:00:00");
    let e = Employee::from_value(doc).unwrap();
    let fields: Vec<_> =
      e.validate().unwrap_err().iter().map(Violation::field).collect();
    assert_eq!(fields, ["name", "email", "updated_at"]);
  }

  #[test]
  fn apply_refreshes_updated_at() {
    let clock = clock();
    let mut e = Employee::create(NewEmployee::new("E-1", "A", "a@x.y"), &clock);
    clock.advance(TimeDelta::hours(1));

    assert!(!e.apply(EmployeeUpdate::default(), &clock));
    assert_eq!(e.updated_at(), e.created_at());

    let changed = e.apply(
      EmployeeUpdate {
        department: Some(Some("Finance".into())),
        ..Default::default()
      },
      &clock,
    );
    assert!(changed);
    assert_eq!(e.department(), Some("Finance"));
    assert_eq!(e.updated_at(), clock.now());
    assert_eq!(e.created_at(), clock.now() - TimeDelta::hours(1));
  }

  #[test]
  fn null_in_an_edit_clears_the_field() {
    let clock = clock();
    let mut e = Employee::from_value(canonical()).unwrap();

    let update = EmployeeUpdate::from_value(json!({
      "department": null,
      "start_date": "2025-02-03"
    }))
    .unwrap();
    assert_eq!(update.department, Some(None));
    assert!(e.apply(update, &clock));
    assert_eq!(e.department(), None);
    assert_eq!(e.start_date(), NaiveDate::from_ymd_opt(2025, 2, 3));
    let out = e.to_value().unwrap();
    assert!(!out.as_object().unwrap().contains_key("department"));

    let untouched = EmployeeUpdate::from_value(json!({ "name": "B" })).unwrap();
    assert_eq!(untouched.department, None);
    assert_eq!(untouched.start_date, None);
  }

  #[test]
  fn new_employee_reports_missing_fields_by_name() {
    let err = NewEmployee::from_value(json!({ "employee_id": "E-1", "name": "A" }))
      .unwrap_err();
    assert_eq!(err, Error::MissingField("email"));

    let input: NewEmployee = serde_json::from_value(json!({
      "employee_id": "E-1",
      "name": "A",
      "email": "a@x.y",
      "department": null
    }))
    .unwrap();
    assert_eq!(input, NewEmployee::new("E-1", "A", "a@x.y"));
  }

  #[test]
  fn updated_at_never_moves_backwards() {
    let clock = clock();
    let mut e = Employee::create(NewEmployee::new("E-1", "A", "a@x.y"), &clock);
    clock.advance(TimeDelta::days(-1));
    e.apply(
      EmployeeUpdate {
        name: Some("B".into()),
        ..Default::default()
      },
      &clock,
    );
    assert_eq!(e.updated_at(), e.created_at());
    assert_eq!(e.validate(), Ok(()));
  }

  #[test]
  fn status_transitions() {
    let clock = clock();
    let mut e = Employee::create(NewEmployee::new("E-1", "A", "a@x.y"), &clock);
    clock.advance(TimeDelta::minutes(5));

    e.transition(EmployeeStatus::Active, &clock).unwrap();
    assert_eq!(e.status(), EmployeeStatus::Active);
    assert_eq!(e.updated_at(), clock.now());

    let err = e.transition(EmployeeStatus::Pending, &clock).unwrap_err();
    assert_eq!(
      err,
      Error::InvalidTransition {
        field: "status",
        from:  "active".into(),
        to:    "pending".into(),
      }
    );

    e.transition(EmployeeStatus::Terminated, &clock).unwrap();
    assert!(e.status().is_terminal());
    assert!(e.transition(EmployeeStatus::Active, &clock).is_err());
  }

  #[test]
  fn status_parses_from_wire_string() {
    assert_eq!(
      "terminated".parse::<EmployeeStatus>().unwrap(),
      EmployeeStatus::Terminated
    );
    assert_eq!(EmployeeStatus::Active.as_ref(), "active");
  }
}
