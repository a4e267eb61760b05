//! DuckDB database backend implementation
//!
//! One connection serves both SQL execution and the option store; options
//! live in the `plinth_options` table next to the repo's own tables.

use crate::error::{DbError, DbResult};
use crate::traits::{Database, OptionStore};
use async_trait::async_trait;
use duckdb::Connection;
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Table backing the option store
pub const OPTIONS_TABLE: &str = "plinth_options";

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Self::with_connection(conn, ":memory:")
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Self::with_connection(conn, &path.display().to_string())
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn with_connection(conn: Connection, location: &str) -> DbResult<Self> {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {OPTIONS_TABLE} (
                 option_name  VARCHAR PRIMARY KEY,
                 option_value VARCHAR NOT NULL
             );"
        ))
        .map_err(|e| DbError::ConnectionError(format!("failed to create {OPTIONS_TABLE}: {e}")))?;
        log::debug!("Opened DuckDB at {location} ({OPTIONS_TABLE} ready)");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;

        let (schema, table) = match name.rfind('.') {
            Some(pos) => (&name[..pos], &name[pos + 1..]),
            None => ("main", name),
        };

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
                duckdb::params![schema, table],
                |row| row.get(0),
            )
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;

        Ok(count > 0)
    }
}

fn read_option(conn: &Connection, name: &str) -> DbResult<Option<Value>> {
    let raw: Option<String> = match conn.query_row(
        &format!("SELECT option_value FROM {OPTIONS_TABLE} WHERE option_name = ?"),
        duckdb::params![name],
        |row| row.get(0),
    ) {
        Ok(raw) => Some(raw),
        Err(duckdb::Error::QueryReturnedNoRows) => None,
        Err(e) => {
            return Err(DbError::OptionError {
                name: name.to_string(),
                message: e.to_string(),
            })
        }
    };

    raw.map(|text| {
        serde_json::from_str(&text).map_err(|e| DbError::OptionDecode {
            name: name.to_string(),
            source: e,
        })
    })
    .transpose()
}

fn write_option(conn: &Connection, name: &str, value: &Value) -> DbResult<()> {
    conn.execute(
        &format!(
            "INSERT INTO {OPTIONS_TABLE} (option_name, option_value) VALUES (?, ?)
             ON CONFLICT (option_name) DO UPDATE SET option_value = excluded.option_value"
        ),
        duckdb::params![name, value.to_string()],
    )
    .map_err(|e| DbError::OptionError {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[async_trait]
impl OptionStore for DuckDbBackend {
    async fn get_option(&self, name: &str) -> DbResult<Option<Value>> {
        let conn = self.lock()?;
        read_option(&conn, name)
    }

    async fn update_option(&self, name: &str, value: &Value) -> DbResult<()> {
        let conn = self.lock()?;
        write_option(&conn, name, value)
    }

    async fn delete_option(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;
        let removed = conn
            .execute(
                &format!("DELETE FROM {OPTIONS_TABLE} WHERE option_name = ?"),
                duckdb::params![name],
            )
            .map_err(|e| DbError::OptionError {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        Ok(removed > 0)
    }

    async fn compare_and_set(
        &self,
        name: &str,
        expected: Option<&Value>,
        new: &Value,
    ) -> DbResult<bool> {
        // The connection lock is held across read and write.
        let conn = self.lock()?;
        let current = read_option(&conn, name)?;
        if current.as_ref() != expected {
            return Ok(false);
        }
        write_option(&conn, name, new)?;
        Ok(true)
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
