//! Property tests over generated wire documents.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use proptest::prelude::*;
use serde_json::{Value, json};

use crate::{
  clock::{FixedClock, format_timestamp},
  document::Document,
  employee::{Employee, EmployeeUpdate},
};

const EMPLOYEE_FIELDS: [&str; 9] = [
  "employee_id",
  "sort_key",
  "name",
  "email",
  "department",
  "start_date",
  "status",
  "created_at",
  "updated_at",
];

const DOCUMENT_FIELDS: [&str; 9] = [
  "employee_id",
  "document_id",
  "document_type",
  "file_name",
  "s3_key",
  "upload_date",
  "status",
  "file_size",
  "content_type",
];

fn epoch() -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2020, 1, 1)
    .unwrap()
    .and_hms_opt(0, 0, 0)
    .unwrap()
}

fn timestamp() -> impl Strategy<Value = NaiveDateTime> {
  (
    0i64..400_000_000,
    prop_oneof![Just(0i64), 0i64..1_000_000_000],
  )
    .prop_map(|(secs, nanos)| {
      epoch() + TimeDelta::seconds(secs) + TimeDelta::nanoseconds(nanos)
    })
}

fn date() -> impl Strategy<Value = String> {
  (2000i32..2040, 1u32..=12, 1u32..=28)
    .prop_map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}"))
}

fn employee_doc() -> impl Strategy<Value = Value> {
  (
    "E-[0-9]{1,6}",
    "[A-Z][a-z]{0,8}( [A-Z][a-z]{0,8})?",
    "[a-z]{1,8}@[a-z]{1,8}\\.[a-z]{2,3}",
    proptest::option::of("[A-Z][a-z]{2,10}"),
    proptest::option::of(date()),
    prop_oneof![Just("pending"), Just("active"), Just("terminated")],
    timestamp(),
    0i64..100_000_000,
  )
    .prop_map(
      |(id, name, email, department, start_date, status, created, delta)| {
        let mut doc = json!({
          "employee_id": id,
          "sort_key": "PROFILE",
          "name": name,
          "email": email,
          "status": status,
          "created_at": format_timestamp(&created),
          "updated_at": format_timestamp(&(created + TimeDelta::seconds(delta))),
        });
        if let Some(d) = department {
          doc["department"] = json!(d);
        }
        if let Some(d) = start_date {
          doc["start_date"] = json!(d);
        }
        doc
      },
    )
}

fn document_doc() -> impl Strategy<Value = Value> {
  (
    "E-[0-9]{1,6}",
    "D-[0-9]{1,6}",
    prop_oneof![Just("id"), Just("contract"), Just("tax"), Just("other")],
    "[a-z]{1,12}\\.(pdf|png|txt)",
    prop_oneof![Just("uploaded"), Just("verified"), Just("rejected")],
    timestamp(),
    0i64..i64::MAX,
    prop_oneof![
      Just("application/pdf"),
      Just("image/png"),
      Just("text/plain; charset=utf-8"),
    ],
  )
    .prop_map(
      |(emp, doc_id, kind, file, status, uploaded, size, content_type)| {
        json!({
          "employee_id": emp,
          "document_id": doc_id,
          "document_type": kind,
          "file_name": file,
          "s3_key": format!("employees/{emp}/{doc_id}/{file}"),
          "upload_date": format_timestamp(&uploaded),
          "status": status,
          "file_size": size,
          "content_type": content_type,
        })
      },
    )
}

/// Any JSON scalar, to throw at the decoders.
fn scalar() -> impl Strategy<Value = Value> {
  prop_oneof![
    Just(Value::Null),
    any::<bool>().prop_map(Value::from),
    any::<i64>().prop_map(Value::from),
    ".{0,24}".prop_map(Value::from),
    timestamp().prop_map(|t| Value::from(format_timestamp(&t))),
  ]
}

fn arbitrary_object(
  fields: &'static [&'static str],
) -> impl Strategy<Value = Value> {
  proptest::collection::vec(proptest::option::of(scalar()), fields.len())
    .prop_map(move |values| {
      let map = fields
        .iter()
        .zip(values)
        .filter_map(|(k, v)| v.map(|v| ((*k).to_owned(), v)))
        .collect();
      Value::Object(map)
    })
}

fn extras() -> impl Strategy<Value = Vec<(String, Value)>> {
  proptest::collection::vec(("x_[a-z]{1,8}", scalar()), 0..4)
}

proptest! {
  #[test]
  fn employee_round_trips(doc in employee_doc()) {
    let e = Employee::from_value(doc.clone()).unwrap();
    prop_assert!(e.validate().is_ok());
    let bytes = e.to_json().unwrap();
    prop_assert_eq!(&Employee::from_json(bytes.as_bytes()).unwrap(), &e);
    prop_assert_eq!(e.to_value().unwrap(), doc);
  }

  #[test]
  fn document_round_trips(doc in document_doc()) {
    let d = Document::from_value(doc.clone()).unwrap();
    prop_assert!(d.validate().is_ok());
    let bytes = d.to_json().unwrap();
    prop_assert_eq!(&Document::from_json(bytes.as_bytes()).unwrap(), &d);
    prop_assert_eq!(d.to_value().unwrap(), doc);
  }

  #[test]
  fn updated_at_stays_ahead_of_created_at(
    doc in employee_doc(),
    steps in proptest::collection::vec(-10_000i64..10_000, 1..8),
  ) {
    let mut e = Employee::from_value(doc).unwrap();
    let clock = FixedClock::new(e.updated_at());
    for (i, step) in steps.into_iter().enumerate() {
      clock.advance(TimeDelta::seconds(step));
      e.apply(EmployeeUpdate { name: Some(format!("N{i}")), ..Default::default() }, &clock);
      prop_assert!(e.created_at() <= e.updated_at());
      prop_assert!(
        format_timestamp(&e.created_at()) <= format_timestamp(&e.updated_at())
      );
    }
  }

  #[test]
  fn employee_decode_and_validate_are_total(
    doc in arbitrary_object(&EMPLOYEE_FIELDS),
  ) {
    if let Ok(e) = Employee::from_value(doc) {
      if let Err(violations) = e.validate() {
        prop_assert!(!violations.is_empty());
      }
    }
  }

  #[test]
  fn document_decode_and_validate_are_total(
    doc in arbitrary_object(&DOCUMENT_FIELDS),
  ) {
    if let Ok(d) = Document::from_value(doc) {
      if let Err(violations) = d.validate() {
        prop_assert!(!violations.is_empty());
      }
    }
  }

  #[test]
  fn extra_fields_do_not_change_the_record(
    doc in document_doc(),
    extra in extras(),
  ) {
    let mut noisy = doc.clone();
    for (k, v) in extra {
      noisy[k.as_str()] = v;
    }
    prop_assert_eq!(
      Document::from_value(noisy).unwrap(),
      Document::from_value(doc).unwrap()
    );
  }
}
