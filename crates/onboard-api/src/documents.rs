//! Handlers for `/employees/:employee_id/documents` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `…/documents` | All documents of the employee, by `document_id` |
//! | `POST` | `…/documents` | Body: [`CreateBody`]; 404 if the employee is unknown |
//! | `GET`  | `…/documents/:document_id` | 404 if not found |
//! | `POST` | `…/documents/:document_id/verify` | `uploaded → verified`, else 409 |
//! | `POST` | `…/documents/:document_id/reject` | `uploaded → rejected`, else 409 |

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use onboard_core::{
  document::{Document, DocumentStatus, DocumentType, NewDocument},
  keys::{DocumentId, EmployeeId, default_blob_key},
  store::OnboardingStore,
  wire::Fields,
};
use serde_json::Value;

use crate::{AppState, employees, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /employees/:employee_id/documents`
pub async fn list<S: OnboardingStore>(
  State(state): State<AppState<S>>,
  Path(employee_id): Path<EmployeeId>,
) -> Result<Json<Vec<Document>>, ApiError> {
  employees::fetch(&state, &employee_id).await?;
  let documents = state
    .store
    .list_documents(&employee_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(documents))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /employees/:employee_id/documents`.
///
/// The employee comes from the path. `s3_key` defaults to
/// `employees/{employee_id}/{document_id}/{file_name}`.
#[derive(Debug)]
pub struct CreateBody {
  pub document_id:   DocumentId,
  pub document_type: DocumentType,
  pub file_name:     String,
  pub s3_key:        Option<String>,
  pub file_size:     i64,
  pub content_type:  String,
}

impl CreateBody {
  pub fn from_value(value: Value) -> onboard_core::Result<Self> {
    let mut f = Fields::from_value(value)?;
    Ok(Self {
      document_id:   f.required("document_id")?,
      document_type: f.required("document_type")?,
      file_name:     f.required("file_name")?,
      s3_key:        f.optional("s3_key")?,
      file_size:     f.required("file_size")?,
      content_type:  f.required("content_type")?,
    })
  }
}

/// `POST /employees/:employee_id/documents`
pub async fn create<S: OnboardingStore>(
  State(state): State<AppState<S>>,
  Path(employee_id): Path<EmployeeId>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
  let Json(value) = payload?;
  let body = CreateBody::from_value(value)?;
  let s3_key = body.s3_key.unwrap_or_else(|| {
    default_blob_key(&employee_id, &body.document_id, &body.file_name)
  });
  let document = Document::create(
    NewDocument {
      employee_id,
      document_id: body.document_id,
      document_type: body.document_type,
      file_name: body.file_name,
      s3_key,
      file_size: body.file_size,
      content_type: body.content_type,
    },
    state.clock.as_ref(),
  );
  if let Err(violations) = document.validate() {
    tracing::warn!(
      employee_id = %document.employee_id(),
      ?violations,
      "rejected document"
    );
    return Err(ApiError::Invalid(violations));
  }

  state
    .store
    .insert_document(&document)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(
    employee_id = %document.employee_id(),
    document_id = %document.document_id(),
    document_type = %document.document_type(),
    "document recorded"
  );
  Ok((StatusCode::CREATED, Json(document)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /employees/:employee_id/documents/:document_id`
pub async fn get_one<S: OnboardingStore>(
  State(state): State<AppState<S>>,
  Path((employee_id, document_id)): Path<(EmployeeId, DocumentId)>,
) -> Result<Json<Document>, ApiError> {
  let document = fetch(&state, &employee_id, &document_id).await?;
  Ok(Json(document))
}

// ─── Verification ─────────────────────────────────────────────────────────────

/// `POST /employees/:employee_id/documents/:document_id/verify`
pub async fn verify<S: OnboardingStore>(
  State(state): State<AppState<S>>,
  Path((employee_id, document_id)): Path<(EmployeeId, DocumentId)>,
) -> Result<Json<Document>, ApiError> {
  set_status(&state, &employee_id, &document_id, DocumentStatus::Verified)
    .await
    .map(Json)
}

/// `POST /employees/:employee_id/documents/:document_id/reject`
pub async fn reject<S: OnboardingStore>(
  State(state): State<AppState<S>>,
  Path((employee_id, document_id)): Path<(EmployeeId, DocumentId)>,
) -> Result<Json<Document>, ApiError> {
  set_status(&state, &employee_id, &document_id, DocumentStatus::Rejected)
    .await
    .map(Json)
}

/// Apply a verification decision. The write is guarded on the status read
/// here, so of two racing decisions only the first lands.
async fn set_status<S: OnboardingStore>(
  state: &AppState<S>,
  employee_id: &EmployeeId,
  document_id: &DocumentId,
  next: DocumentStatus,
) -> Result<Document, ApiError> {
  let mut document = fetch(state, employee_id, document_id).await?;
  let read_status = document.status();
  document.transition(next)?;
  state
    .store
    .update_document(&document, read_status)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(%employee_id, %document_id, status = %next, "document status changed");
  Ok(document)
}

async fn fetch<S: OnboardingStore>(
  state: &AppState<S>,
  employee_id: &EmployeeId,
  document_id: &DocumentId,
) -> Result<Document, ApiError> {
  state
    .store
    .get_document(employee_id, document_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| {
      ApiError::NotFound(format!(
        "document {document_id} not found for employee {employee_id}"
      ))
    })
}
