//! ODM2 relational store handle
//!
//! A [`Store`] wraps one SQLite connection. Callers open it at the start of a
//! request, hand it to [`crate::dao::Odm2Dao::session`], and drop it when the
//! request is done. Nothing else in the crate holds a connection.
//!
//! - **schema**: ODM2 subset DDL
//! - **rows**: raw joined-row types produced by the query layer
//! - **error**: store error types

pub mod error;
pub mod rows;
pub mod schema;

#[cfg(test)]
pub(crate) mod fixtures;

pub use error::{StoreError, StoreResult};
pub use schema::{ODM2_SCHEMA, ODM2_TABLES};

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// An open connection to an ODM2 database
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open an existing database file
    ///
    /// Read-only handles never create the file; read-write handles do.
    pub fn open(path: &Path, read_only: bool) -> StoreResult<Self> {
        let flags = if read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn =
            Connection::open_with_flags(path, flags).map_err(|e| StoreError::Unavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| StoreError::Unavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), read_only, "Opened ODM2 store");

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory database (tests, benches, scratch use)
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::Unavailable {
            path: PathBuf::from(":memory:"),
            reason: e.to_string(),
        })?;
        Ok(Self { conn, path: None })
    }

    /// Create the ODM2 tables if they do not already exist
    pub fn install_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(ODM2_SCHEMA)?;
        Ok(())
    }

    /// Run a batch of SQL statements (schema patches, seed data)
    pub fn execute_batch(&self, sql: &str) -> StoreResult<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Run a SQL script file
    pub fn execute_script(&self, path: &Path) -> StoreResult<()> {
        let sql = std::fs::read_to_string(path)?;
        self.execute_batch(&sql)
    }

    /// Liveness probe: touches the sampling feature table
    pub fn ping(&self) -> StoreResult<()> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT samplingfeatureid FROM samplingfeatures LIMIT 1")?;
        let mut rows = stmt.query([])?;
        rows.next()?;
        Ok(())
    }

    /// Count rows in one of the ODM2 tables
    pub fn table_count(&self, table: &str) -> StoreResult<u64> {
        if !ODM2_TABLES.contains(&table) {
            return Err(StoreError::Query(rusqlite::Error::InvalidParameterName(
                table.to_string(),
            )));
        }
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }

    /// The database file path, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_install_schema_in_memory() {
        let store = Store::open_in_memory().unwrap();
        store.install_schema().unwrap();

        for table in ODM2_TABLES {
            assert_eq!(store.table_count(table).unwrap(), 0, "table {}", table);
        }
        store.ping().unwrap();
    }

    #[test]
    fn test_ping_without_schema_fails() {
        let store = Store::open_in_memory().unwrap();
        let err = store.ping().unwrap_err();
        assert!(matches!(err, StoreError::Query(_)));
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_open_missing_file_read_only_is_unavailable() {
        let dir = tempdir().unwrap();
        let err = Store::open(&dir.path().join("missing.sqlite"), true)
            .err()
            .unwrap();
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_file_store_persists_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db").join("odm2.sqlite");

        {
            let store = Store::open(&path, false).unwrap();
            store.install_schema().unwrap();
            store
                .execute_batch(
                    "INSERT INTO units VALUES (1, 'Length', 'm', 'meter');",
                )
                .unwrap();
        }

        let store = Store::open(&path, true).unwrap();
        assert_eq!(store.table_count("units").unwrap(), 1);
        assert_eq!(store.path(), Some(path.as_path()));
    }

    #[test]
    fn test_table_count_rejects_unknown_table() {
        let store = Store::open_in_memory().unwrap();
        store.install_schema().unwrap();
        assert!(store.table_count("sqlite_master; DROP TABLE units").is_err());
    }

    #[test]
    fn test_execute_script() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("seed.sql");
        std::fs::write(
            &script,
            "INSERT INTO processinglevels VALUES (1, 'Raw', 'Raw data', NULL);",
        )
        .unwrap();

        let store = Store::open_in_memory().unwrap();
        store.install_schema().unwrap();
        store.execute_script(&script).unwrap();
        assert_eq!(store.table_count("processinglevels").unwrap(), 1);
    }
}
