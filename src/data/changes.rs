//! Data access objects for the change log and session markers

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

use super::models::{Change, ChangeRecord, DebugEndpoint, EditOp};

/// Append-only store for the global ordered change log.
///
/// Rows are never updated or deleted; retrieval is always in insertion order
/// (timestamp ascending, id as tie-break) and by nothing else.
#[derive(Clone)]
pub struct ChangeStore {
    conn: Arc<Mutex<Connection>>,
}

impl ChangeStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Insert a single change. The id and timestamp are assigned here.
    pub fn insert_one(&self, change: &Change, terminal_output: &str) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"INSERT INTO changes (timestamp, file_name, change_type, content, line, "column", indent, terminal_output)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                Utc::now().to_rfc3339(),
                change.file_name,
                change.op.kind(),
                change.op.text(),
                change.line as i64,
                change.column as i64,
                change.indent as i64,
                terminal_output,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert a batch of changes as one all-or-nothing transaction.
    ///
    /// Every record in the batch is stamped with the same `shared_output`
    /// and the same timestamp; on any failure the whole batch rolls back,
    /// so readers never observe partial batches.
    pub fn insert_batch(&self, changes: &[Change], shared_output: &str) -> SqliteResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let now = Utc::now().to_rfc3339();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO changes (timestamp, file_name, change_type, content, line, "column", indent, terminal_output)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            )?;
            for change in changes {
                stmt.execute(params![
                    now,
                    change.file_name,
                    change.op.kind(),
                    change.op.text(),
                    change.line as i64,
                    change.column as i64,
                    change.indent as i64,
                    shared_output,
                ])?;
            }
        }
        tx.commit()
    }

    /// Get every stored record in global log order.
    pub fn get_all(&self) -> SqliteResult<Vec<ChangeRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"SELECT id, timestamp, file_name, change_type, content, line, "column", indent, terminal_output
               FROM changes ORDER BY timestamp ASC, id ASC"#,
        )?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(records)
    }

    /// Convert a database row to a ChangeRecord
    fn row_to_record(row: &rusqlite::Row) -> SqliteResult<ChangeRecord> {
        let timestamp_str: String = row.get(1)?;
        let change_type: String = row.get(3)?;
        let content: String = row.get(4)?;
        let terminal_output: Option<String> = row.get(8)?;

        Ok(ChangeRecord {
            id: row.get(0)?,
            timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            file_name: row.get(2)?,
            op: EditOp::from_parts(&change_type, content),
            line: row.get::<_, i64>(5)? as usize,
            column: row.get::<_, i64>(6)? as usize,
            indent: row.get::<_, i64>(7)? as usize,
            terminal_output: terminal_output.unwrap_or_default(),
        })
    }
}

/// Append-only store for debug-session boundary markers.
#[derive(Clone)]
pub struct EndpointStore {
    conn: Arc<Mutex<Connection>>,
}

impl EndpointStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Append a marker carrying the cumulative change count at a session end.
    pub fn insert(&self, change_count: usize) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO debug_endpoints (recorded_at, change_count) VALUES (?1, ?2)",
            params![Utc::now().to_rfc3339(), change_count as i64],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Get all markers in the order they were recorded.
    pub fn get_all(&self) -> SqliteResult<Vec<DebugEndpoint>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, recorded_at, change_count FROM debug_endpoints ORDER BY id ASC",
        )?;

        let endpoints = stmt
            .query_map([], |row| {
                let recorded_at_str: String = row.get(1)?;
                Ok(DebugEndpoint {
                    id: row.get(0)?,
                    recorded_at: DateTime::parse_from_rfc3339(&recorded_at_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                    change_count: row.get::<_, i64>(2)? as usize,
                })
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(endpoints)
    }

    /// Just the cumulative counts, in marker order (the viewer payload shape).
    pub fn counts(&self) -> SqliteResult<Vec<usize>> {
        Ok(self.get_all()?.into_iter().map(|e| e.change_count).collect())
    }
}
