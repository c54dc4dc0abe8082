//! sqlx session shared by the PostgreSQL, MySQL and SQLite drivers
//!
//! Each driver only turns its URL into one sqlx understands; connecting,
//! version bookkeeping and the per-file transaction live here on an
//! [`AnyConnection`].

use crate::error::{DbError, DbResult};
use crate::tracking;
use crate::traits::{closed, read_migration, Connection};
use async_trait::async_trait;
use mg_core::{MigrationFile, Version};
use sqlx::any::install_default_drivers;
use sqlx::AnyConnection;
use sqlx::{Connection as _, Executor, Row};
use std::sync::Once;

static INSTALL_DRIVERS: Once = Once::new();

/// Connect to `url` and make sure the version table exists.
///
/// `driver` names the backend in error messages so the URL, which may carry
/// a password, is never echoed.
pub(crate) async fn connect(url: &str, driver: &str) -> DbResult<Box<dyn Connection>> {
    INSTALL_DRIVERS.call_once(install_default_drivers);

    let mut conn = AnyConnection::connect(url)
        .await
        .map_err(|e| DbError::ConnectionError(format!("{driver}: {e}")))?;

    let create = tracking::create_table_sql();
    Executor::execute(&mut conn, create.as_str())
        .await
        .map_err(|e| DbError::StorageError(format!("cannot create version table: {e}")))?;

    log::debug!("Connected to {}", driver);
    Ok(Box::new(SqlxSession { conn: Some(conn) }))
}

/// An open sqlx connection
pub struct SqlxSession {
    conn: Option<AnyConnection>,
}

#[async_trait]
impl Connection for SqlxSession {
    async fn version(&mut self) -> DbResult<Version> {
        let conn = self.conn.as_mut().ok_or_else(closed)?;
        let sql = tracking::current_version_sql();
        let row = sqlx::query(&sql)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| DbError::StorageError(format!("cannot read version: {e}")))?;
        let raw: i64 = row
            .try_get(0)
            .map_err(|e| DbError::StorageError(format!("cannot read version: {e}")))?;
        tracking::stored_version(raw)
    }

    async fn apply(&mut self, file: &MigrationFile) -> DbResult<()> {
        let conn = self.conn.as_mut().ok_or_else(closed)?;
        let sql = read_migration(file).await?;
        let record = tracking::record_sql(file);

        let mut tx = conn.begin().await?;
        if !sql.trim().is_empty() {
            Executor::execute(&mut *tx, sql.as_str())
                .await
                .map_err(|e| DbError::ExecutionError(format!("{}: {e}", file.file_name)))?;
        }
        Executor::execute(&mut *tx, record.as_str())
            .await
            .map_err(|e| {
                DbError::StorageError(format!("cannot record {}: {e}", file.file_name))
            })?;
        tx.commit().await?;
        Ok(())
    }

    async fn close(&mut self) -> DbResult<()> {
        let conn = self.conn.take().ok_or_else(closed)?;
        conn.close()
            .await
            .map_err(|e| DbError::ConnectionError(format!("close failed: {e}")))
    }
}
