//! DuckDB driver

use crate::error::{DbError, DbResult};
use crate::tracking;
use crate::traits::{closed, read_migration, strip_scheme, Connection, Driver};
use async_trait::async_trait;
use mg_core::{MigrationFile, Version};
use std::path::Path;

/// Runs `.sql` migrations against a DuckDB database file.
///
/// URL form: `duckdb://<path>`; `duckdb://:memory:` or `duckdb://` opens an
/// in-memory database.
#[derive(Debug, Default, Clone, Copy)]
pub struct DuckDbDriver;

#[async_trait]
impl Driver for DuckDbDriver {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn file_extension(&self) -> &'static str {
        "sql"
    }

    async fn connect(&self, url: &str) -> DbResult<Box<dyn Connection>> {
        let path = strip_scheme(url, &["duckdb"])?;
        let conn = DuckDbConnection::open(path)?;
        Ok(Box::new(conn))
    }
}

/// An open DuckDB database
pub struct DuckDbConnection {
    conn: Option<duckdb::Connection>,
}

impl DuckDbConnection {
    /// Open the database at `path` and make sure the version table exists.
    pub fn open(path: &str) -> DbResult<Self> {
        let conn = if path.is_empty() || path == ":memory:" {
            duckdb::Connection::open_in_memory()
        } else {
            duckdb::Connection::open(Path::new(path))
        }
        .map_err(|e| DbError::ConnectionError(format!("{e}: {path}")))?;

        conn.execute_batch(&tracking::create_table_sql())
            .map_err(|e| DbError::StorageError(format!("cannot create version table: {e}")))?;
        log::debug!("Opened duckdb database '{}'", path);
        Ok(Self { conn: Some(conn) })
    }

    fn conn(&self) -> DbResult<&duckdb::Connection> {
        self.conn.as_ref().ok_or_else(closed)
    }

    fn apply_sql(&self, file: &MigrationFile, sql: &str) -> DbResult<()> {
        let conn = self.conn()?;
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::ExecutionError(format!("BEGIN failed: {e}")))?;

        let result = run_in_transaction(conn, file, sql);
        match &result {
            Ok(()) => {
                if let Err(commit_err) = conn.execute_batch("COMMIT") {
                    let _ = conn.execute_batch("ROLLBACK");
                    return Err(DbError::ExecutionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => {
                let _ = conn.execute_batch("ROLLBACK");
            }
        }
        result
    }
}

fn run_in_transaction(conn: &duckdb::Connection, file: &MigrationFile, sql: &str) -> DbResult<()> {
    if !sql.trim().is_empty() {
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {e}", file.file_name)))?;
    }
    conn.execute_batch(&tracking::record_sql(file))
        .map_err(|e| DbError::StorageError(format!("cannot record {}: {e}", file.file_name)))
}

#[async_trait]
impl Connection for DuckDbConnection {
    async fn version(&mut self) -> DbResult<Version> {
        let raw: i64 = self
            .conn()?
            .query_row(&tracking::current_version_sql(), [], |row| row.get(0))
            .map_err(|e| DbError::StorageError(format!("cannot read version: {e}")))?;
        tracking::stored_version(raw)
    }

    async fn apply(&mut self, file: &MigrationFile) -> DbResult<()> {
        self.conn()?;
        let sql = read_migration(file).await?;
        self.apply_sql(file, &sql)
    }

    async fn close(&mut self) -> DbResult<()> {
        match self.conn.take() {
            Some(conn) => conn
                .close()
                .map_err(|(_, e)| DbError::ConnectionError(format!("close failed: {e}"))),
            None => Err(closed()),
        }
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
