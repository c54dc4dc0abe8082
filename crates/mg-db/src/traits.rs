//! Driver capability traits

use crate::error::{DbError, DbResult};
use async_trait::async_trait;
use mg_core::{MigrationFile, Version};

/// A database backend that can run migration files.
///
/// Implementations are selected by identifier (see [`crate::driver_for`]) and
/// never inspected by the planner or executor beyond this interface.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Driver identifier for logging and URL schemes
    fn name(&self) -> &'static str;

    /// Extension of the migration files this driver executes (no dot)
    fn file_extension(&self) -> &'static str;

    /// Open a connection, creating the version record at version 0 if absent
    async fn connect(&self, url: &str) -> DbResult<Box<dyn Connection>>;
}

/// An open connection owned by one migration run.
#[async_trait]
pub trait Connection: Send {
    /// Version currently recorded in the database
    async fn version(&mut self) -> DbResult<Version>;

    /// Execute one migration file and record its effect on the version.
    ///
    /// An up file records its version; a down file removes it. Backends with
    /// transactions do both in one unit of work.
    async fn apply(&mut self, file: &MigrationFile) -> DbResult<()>;

    /// Release the connection. Further calls fail with a connection error.
    async fn close(&mut self) -> DbResult<()>;
}

/// Read a migration file's text.
pub(crate) async fn read_migration(file: &MigrationFile) -> DbResult<String> {
    tokio::fs::read_to_string(&file.path)
        .await
        .map_err(|e| DbError::ReadFile {
            path: file.path.display().to_string(),
            source: e,
        })
}

/// Strip `<scheme>://` from a URL, returning the remainder.
pub(crate) fn strip_scheme<'a>(url: &'a str, schemes: &[&str]) -> DbResult<&'a str> {
    let (scheme, rest) = url.split_once("://").ok_or_else(|| DbError::InvalidUrl {
        url: url.to_string(),
        reason: "expected <driver>://...".to_string(),
    })?;
    if !schemes.contains(&scheme) {
        return Err(DbError::InvalidUrl {
            url: url.to_string(),
            reason: format!("expected scheme {}", schemes.join(" or ")),
        });
    }
    Ok(rest)
}

pub(crate) fn closed() -> DbError {
    DbError::ConnectionError("connection already closed".to_string())
}
