//! [`SqliteStore`], the SQLite implementation of [`OnboardingStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use onboard_core::{
  document::{Document, DocumentStatus},
  employee::{Employee, EmployeeStatus},
  keys::{DocumentId, EmployeeId, PROFILE_SORT_KEY, RecordKey},
  store::OnboardingStore,
};

use crate::{
  encode::{DOCUMENT, EMPLOYEE, RawRecord, decode_document, decode_employee},
  schema::SCHEMA,
  Error, Result,
};

/// What happened to a conditional insert.
enum Insert {
  Done,
  KeyTaken,
  MissingParent,
}

/// What happened to a status-guarded update.
enum Update {
  Done,
  Missing,
  Stale { expected: String, found: String },
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An onboarding store backed by a single SQLite file.
///
/// Clones share the inner connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert `row` unless its key is taken. When `parent` is given, the row
  /// is only inserted if that key exists.
  async fn insert_row(
    &self,
    row: RawRecord,
    parent: Option<RecordKey>,
  ) -> Result<Insert> {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if let Some(parent) = parent
          && !row_exists(&tx, &parent)?
        {
          return Ok(Insert::MissingParent);
        }

        let key = RecordKey {
          partition: row.partition_key.clone(),
          sort:      row.sort_key.clone(),
        };
        if row_exists(&tx, &key)? {
          return Ok(Insert::KeyTaken);
        }

        tx.execute(
          "INSERT INTO records (partition_key, sort_key, record_type, status, body)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            row.partition_key,
            row.sort_key,
            row.record_type,
            row.status,
            row.body,
          ],
        )?;
        tx.commit()?;
        Ok(Insert::Done)
      })
      .await?;
    Ok(outcome)
  }

  /// Overwrite the status and body of an existing row of `row.record_type`,
  /// provided its stored status is still `expected`.
  async fn update_row(
    &self,
    row: RawRecord,
    expected: String,
  ) -> Result<Update> {
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let found: Option<String> = tx
          .query_row(
            "SELECT status FROM records
             WHERE partition_key = ?1 AND sort_key = ?2 AND record_type = ?3",
            rusqlite::params![row.partition_key, row.sort_key, row.record_type],
            |r| r.get::<_, String>(0),
          )
          .optional()?;
        let Some(found) = found else {
          return Ok(Update::Missing);
        };
        if found != expected {
          return Ok(Update::Stale { expected, found });
        }

        tx.execute(
          "UPDATE records SET status = ?3, body = ?4
           WHERE partition_key = ?1 AND sort_key = ?2 AND status = ?5",
          rusqlite::params![
            row.partition_key,
            row.sort_key,
            row.status,
            row.body,
            expected,
          ],
        )?;
        tx.commit()?;
        Ok(Update::Done)
      })
      .await?;
    Ok(outcome)
  }

  async fn fetch_body(
    &self,
    key: RecordKey,
    record_type: &'static str,
  ) -> Result<Option<String>> {
    let body = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT body FROM records
               WHERE partition_key = ?1 AND sort_key = ?2 AND record_type = ?3",
              rusqlite::params![key.partition, key.sort, record_type],
              |row| row.get::<_, String>(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(body)
  }
}

fn row_exists(
  conn: &rusqlite::Connection,
  key: &RecordKey,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM records WHERE partition_key = ?1 AND sort_key = ?2",
        rusqlite::params![key.partition, key.sort],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

// ─── OnboardingStore impl ────────────────────────────────────────────────────

impl OnboardingStore for SqliteStore {
  type Error = Error;

  // ── Employees ─────────────────────────────────────────────────────────────

  async fn insert_employee(&self, employee: &Employee) -> Result<()> {
    let row = RawRecord::from_employee(employee)?;
    match self.insert_row(row, None).await? {
      Insert::Done => {
        tracing::debug!(employee_id = %employee.employee_id(), "inserted employee");
        Ok(())
      }
      Insert::KeyTaken | Insert::MissingParent => {
        Err(Error::EmployeeExists(employee.employee_id().clone()))
      }
    }
  }

  async fn get_employee(&self, id: &EmployeeId) -> Result<Option<Employee>> {
    self
      .fetch_body(RecordKey::profile(id), EMPLOYEE)
      .await?
      .as_deref()
      .map(decode_employee)
      .transpose()
  }

  async fn list_employees(
    &self,
    status: Option<EmployeeStatus>,
  ) -> Result<Vec<Employee>> {
    let status_str = status.map(|s| s.to_string());

    let bodies: Vec<String> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(s) = status_str {
          let mut stmt = conn.prepare(
            "SELECT body FROM records
             WHERE record_type = ?1 AND status = ?2
             ORDER BY partition_key",
          )?;
          stmt
            .query_map(rusqlite::params![EMPLOYEE, s], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(
            "SELECT body FROM records WHERE record_type = ?1
             ORDER BY partition_key",
          )?;
          stmt
            .query_map(rusqlite::params![EMPLOYEE], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await?;

    bodies.iter().map(|b| decode_employee(b)).collect()
  }

  async fn update_employee(
    &self,
    employee: &Employee,
    expected: EmployeeStatus,
  ) -> Result<()> {
    let row = RawRecord::from_employee(employee)?;
    match self.update_row(row, expected.to_string()).await? {
      Update::Done => {}
      Update::Missing => {
        return Err(Error::EmployeeNotFound(employee.employee_id().clone()));
      }
      Update::Stale { expected, found } => {
        return Err(Error::StaleWrite {
          key: employee.key(),
          expected,
          found,
        });
      }
    }
    tracing::debug!(
      employee_id = %employee.employee_id(),
      status = %employee.status(),
      "updated employee"
    );
    Ok(())
  }

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn insert_document(&self, document: &Document) -> Result<()> {
    let employee_id = document.employee_id();
    let document_id = document.document_id();
    if document_id.as_str() == PROFILE_SORT_KEY {
      return Err(Error::ReservedSortKey(document_id.clone()));
    }

    let row = RawRecord::from_document(document)?;
    match self.insert_row(row, Some(RecordKey::profile(employee_id))).await? {
      Insert::Done => {
        tracing::debug!(
          %employee_id,
          %document_id,
          s3_key = document.s3_key(),
          "inserted document"
        );
        Ok(())
      }
      Insert::MissingParent => Err(Error::MissingEmployee(employee_id.clone())),
      Insert::KeyTaken => Err(Error::DocumentExists {
        employee_id: employee_id.clone(),
        document_id: document_id.clone(),
      }),
    }
  }

  async fn get_document(
    &self,
    employee_id: &EmployeeId,
    document_id: &DocumentId,
  ) -> Result<Option<Document>> {
    self
      .fetch_body(RecordKey::document(employee_id, document_id), DOCUMENT)
      .await?
      .as_deref()
      .map(decode_document)
      .transpose()
  }

  async fn list_documents(
    &self,
    employee_id: &EmployeeId,
  ) -> Result<Vec<Document>> {
    let partition = employee_id.as_str().to_owned();

    let bodies: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT body FROM records
           WHERE partition_key = ?1 AND record_type = ?2
           ORDER BY sort_key",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![partition, DOCUMENT], |row| row.get::<_, String>(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    bodies.iter().map(|b| decode_document(b)).collect()
  }

  async fn update_document(
    &self,
    document: &Document,
    expected: DocumentStatus,
  ) -> Result<()> {
    let row = RawRecord::from_document(document)?;
    match self.update_row(row, expected.to_string()).await? {
      Update::Done => {}
      Update::Missing => {
        return Err(Error::DocumentNotFound {
          employee_id: document.employee_id().clone(),
          document_id: document.document_id().clone(),
        });
      }
      Update::Stale { expected, found } => {
        return Err(Error::StaleWrite {
          key: document.key(),
          expected,
          found,
        });
      }
    }
    tracing::debug!(
      employee_id = %document.employee_id(),
      document_id = %document.document_id(),
      status = %document.status(),
      "updated document"
    );
    Ok(())
  }
}
