//! SQLite-backed upgrade store.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, TransactionBehavior};
use tracing::debug;

use super::{UpgradeRecord, UpgradeRepository, UpgradeStore, UpsertOutcome};
use crate::error::{ErrorCode, UpliftError, UpliftResult};
use crate::quality::Quality;

/// Identifiers per `IN (...)` lookup, well under SQLite's parameter limit.
const FETCH_CHUNK: usize = 500;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed upgrade store.
///
/// Transactions start with `BEGIN IMMEDIATE`, so the compare-then-write in
/// [`UpgradeRepository::upsert`] holds the database write lock even when
/// several processes share the file.
pub struct SqliteUpgradeStore {
    conn: Mutex<Connection>,
}

impl SqliteUpgradeStore {
    /// Open (or create) a store at the given path.
    pub fn new(path: impl AsRef<Path>) -> UpliftResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path.as_ref())?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> UpliftResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> UpliftResult<Self> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> UpliftResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS upgrade (
                identifier TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                quality TEXT NOT NULL,
                added_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_upgrade_added_at ON upgrade(added_at);
        "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> UpliftResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| UpliftError::Database {
            message: e.to_string(),
            code: ErrorCode::DbConnectionFailed,
            source: None,
        })
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> UpliftResult<UpgradeRecord> {
        let identifier: String = row.get(0)?;
        let title: String = row.get(1)?;
        let quality: String = row.get(2)?;
        let added_at: String = row.get(3)?;

        Ok(UpgradeRecord {
            identifier,
            title,
            quality: Quality::parse(&quality),
            added_at: DateTime::parse_from_rfc3339(&added_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| UpliftError::parse(format!("added_at `{added_at}`: {e}")))?,
        })
    }
}

struct SqliteRepository<'c> {
    conn: &'c Connection,
}

impl UpgradeRepository for SqliteRepository<'_> {
    fn fetch_many(&self, identifiers: &BTreeSet<String>) -> UpliftResult<HashMap<String, UpgradeRecord>> {
        let ids: Vec<&String> = identifiers.iter().collect();
        let mut found = HashMap::new();

        for chunk in ids.chunks(FETCH_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let mut stmt = self.conn.prepare(&format!(
                "SELECT identifier, title, quality, added_at FROM upgrade WHERE identifier IN ({placeholders})"
            ))?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| {
                Ok(SqliteUpgradeStore::row_to_record(row))
            })?;
            for row in rows {
                let record = row??;
                found.insert(record.identifier.clone(), record);
            }
        }

        debug!(requested = identifiers.len(), found = found.len(), "Fetched upgrade records");
        Ok(found)
    }

    fn upsert(
        &self,
        identifier: &str,
        quality: Quality,
        title: &str,
        now: DateTime<Utc>,
    ) -> UpliftResult<UpsertOutcome> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT quality FROM upgrade WHERE identifier = ?1",
                params![identifier],
                |row| row.get(0),
            )
            .optional()?;

        match stored.map(|s| Quality::parse(&s)) {
            None => {
                self.conn.execute(
                    "INSERT INTO upgrade (identifier, title, quality, added_at) VALUES (?1, ?2, ?3, ?4)",
                    params![identifier, title, quality.to_string(), now.to_rfc3339()],
                )?;
                Ok(UpsertOutcome::Inserted)
            }
            Some(existing) if quality > existing => {
                self.conn.execute(
                    "UPDATE upgrade SET title = ?2, quality = ?3, added_at = ?4 WHERE identifier = ?1",
                    params![identifier, title, quality.to_string(), now.to_rfc3339()],
                )?;
                Ok(UpsertOutcome::Upgraded)
            }
            Some(_) => Ok(UpsertOutcome::Unchanged),
        }
    }
}

impl UpgradeStore for SqliteUpgradeStore {
    fn with_transaction<T, F>(&self, f: F) -> UpliftResult<T>
    where
        F: FnOnce(&dyn UpgradeRepository) -> UpliftResult<T>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        // Dropping `tx` on the error path rolls back.
        let value = f(&SqliteRepository { conn: &tx })?;
        tx.commit()?;
        Ok(value)
    }

    fn get(&self, identifier: &str) -> UpliftResult<Option<UpgradeRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT identifier, title, quality, added_at FROM upgrade WHERE identifier = ?1",
        )?;

        stmt.query_row(params![identifier.to_lowercase()], |row| {
            Ok(Self::row_to_record(row))
        })
        .optional()?
        .transpose()
    }

    fn list(&self) -> UpliftResult<Vec<UpgradeRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"SELECT identifier, title, quality, added_at
               FROM upgrade
               ORDER BY added_at DESC, identifier ASC"#,
        )?;

        let results = stmt.query_map([], |row| Ok(Self::row_to_record(row)))?;

        results
            .map(|r| r.map_err(|e| e.into()).and_then(|inner| inner))
            .collect()
    }

    fn forget(&self, identifier: &str) -> UpliftResult<bool> {
        let conn = self.lock()?;
        let count = conn.execute(
            "DELETE FROM upgrade WHERE identifier = ?1",
            params![identifier.to_lowercase()],
        )?;
        Ok(count > 0)
    }

    fn clear(&self) -> UpliftResult<usize> {
        let conn = self.lock()?;
        Ok(conn.execute("DELETE FROM upgrade", [])?)
    }

    fn count(&self) -> UpliftResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM upgrade", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
