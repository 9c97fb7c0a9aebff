//! SQL schema for the onboarding SQLite store.
//!
//! Executed once at connection startup.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per record. The profile row of an employee uses sort_key 'PROFILE';
-- document rows use their document_id.
CREATE TABLE IF NOT EXISTS records (
    partition_key TEXT NOT NULL,   -- employee_id
    sort_key      TEXT NOT NULL,   -- 'PROFILE' | document_id
    record_type   TEXT NOT NULL,   -- 'employee' | 'document'
    status        TEXT NOT NULL,   -- copy of the body's status, for filtering
    body          TEXT NOT NULL,   -- wire JSON of the record
    PRIMARY KEY (partition_key, sort_key)
) WITHOUT ROWID;

CREATE INDEX IF NOT EXISTS records_type_status_idx ON records(record_type, status);

PRAGMA user_version = 1;
";
