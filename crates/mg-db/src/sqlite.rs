//! SQLite driver

use crate::error::DbResult;
use crate::session;
use crate::traits::{strip_scheme, Connection, Driver};
use async_trait::async_trait;

/// Runs `.sql` migrations against a SQLite database file.
///
/// URL form: `sqlite3://<path>` (or `sqlite://`); the file is created when
/// missing and `:memory:` opens a throwaway database.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDriver;

/// The sqlx URL for a database path; `mode=rwc` creates a missing file.
pub fn sqlx_url(path: &str) -> String {
    if path.is_empty() || path == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite://{path}?mode=rwc")
    }
}

#[async_trait]
impl Driver for SqliteDriver {
    fn name(&self) -> &'static str {
        "sqlite3"
    }

    fn file_extension(&self) -> &'static str {
        "sql"
    }

    async fn connect(&self, url: &str) -> DbResult<Box<dyn Connection>> {
        let path = strip_scheme(url, &["sqlite3", "sqlite"])?;
        log::debug!("Opening sqlite database '{}'", path);
        session::connect(&sqlx_url(path), &format!("sqlite3 '{path}'")).await
    }
}

#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;
