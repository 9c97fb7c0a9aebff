//! Handlers for `/employees` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/employees` | Optional `?status=pending\|active\|terminated` |
//! | `POST`  | `/employees` | Body: [`NewEmployee`]; returns 201 + profile |
//! | `GET`   | `/employees/:employee_id` | 404 if not found |
//! | `PATCH` | `/employees/:employee_id` | Body: [`PatchBody`] |

use axum::{
  Json,
  extract::{Path, Query, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use onboard_core::{
  employee::{Employee, EmployeeStatus, EmployeeUpdate, NewEmployee},
  keys::EmployeeId,
  store::OnboardingStore,
  wire::Fields,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<EmployeeStatus>,
}

/// `GET /employees[?status=<status>]`
pub async fn list<S: OnboardingStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Employee>>, ApiError> {
  let employees = state
    .store
    .list_employees(params.status)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(employees))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /employees` with body `{"employee_id":"E-1","name":"…","email":"…"}`
pub async fn create<S: OnboardingStore>(
  State(state): State<AppState<S>>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(value) = payload?;
  let input = NewEmployee::from_value(value)?;
  let employee = Employee::create(input, state.clock.as_ref());
  employee.validate().map_err(ApiError::Invalid)?;

  state
    .store
    .insert_employee(&employee)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(employee_id = %employee.employee_id(), "employee created");
  Ok((StatusCode::CREATED, Json(employee)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /employees/:employee_id`
pub async fn get_one<S: OnboardingStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<EmployeeId>,
) -> Result<Json<Employee>, ApiError> {
  let employee = fetch(&state, &id).await?;
  Ok(Json(employee))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /employees/:employee_id`.
///
/// Profile fields overwrite when present, and `null` clears `department` or
/// `start_date`. `status` moves the employee through its lifecycle and is
/// ignored when equal to the current status.
#[derive(Debug, Default)]
pub struct PatchBody {
  pub update: EmployeeUpdate,
  pub status: Option<EmployeeStatus>,
}

impl PatchBody {
  pub fn from_value(value: Value) -> onboard_core::Result<Self> {
    let mut f = Fields::from_value(value)?;
    Ok(Self {
      update: EmployeeUpdate::from_fields(&mut f)?,
      status: f.optional("status")?,
    })
  }
}

/// `PATCH /employees/:employee_id`
///
/// The write only lands if the stored status is still the one read here, so
/// a concurrent status change turns this request into a 409.
pub async fn update<S: OnboardingStore>(
  State(state): State<AppState<S>>,
  Path(id): Path<EmployeeId>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Employee>, ApiError> {
  let Json(value) = payload?;
  let body = PatchBody::from_value(value)?;
  let mut employee = fetch(&state, &id).await?;
  let read_status = employee.status();
  let clock = state.clock.as_ref();

  let mut changed =
    !body.update.is_empty() && employee.apply(body.update, clock);
  if let Some(next) = body.status
    && next != read_status
  {
    employee.transition(next, clock)?;
    changed = true;
  }

  if changed {
    if let Err(violations) = employee.validate() {
      tracing::warn!(employee_id = %id, ?violations, "rejected profile edit");
      return Err(ApiError::Invalid(violations));
    }
    state
      .store
      .update_employee(&employee, read_status)
      .await
      .map_err(ApiError::store)?;
    tracing::info!(employee_id = %id, status = %employee.status(), "employee updated");
  }

  Ok(Json(employee))
}

pub(crate) async fn fetch<S: OnboardingStore>(
  state: &AppState<S>,
  id: &EmployeeId,
) -> Result<Employee, ApiError> {
  state
    .store
    .get_employee(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("employee {id} not found")))
}
