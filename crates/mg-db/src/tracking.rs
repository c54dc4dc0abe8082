//! SQL for the `schema_migrations` version table shared by SQL drivers.
//!
//! One row per applied version; the current version is the maximum, or 0 when
//! the table is empty.

use crate::error::{DbError, DbResult};
use mg_core::{Direction, MigrationFile, Version};

/// Table holding applied versions
pub const VERSION_TABLE: &str = "schema_migrations";

/// Create the version table if it does not exist.
pub fn create_table_sql() -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {VERSION_TABLE} (version BIGINT NOT NULL PRIMARY KEY)"
    )
}

/// Read the current version.
pub fn current_version_sql() -> String {
    format!("SELECT COALESCE(MAX(version), 0) FROM {VERSION_TABLE}")
}

/// Record the effect of applying `file`.
pub fn record_sql(file: &MigrationFile) -> String {
    match file.direction {
        Direction::Up => format!(
            "INSERT INTO {VERSION_TABLE} (version) VALUES ({})",
            file.version
        ),
        Direction::Down => format!(
            "DELETE FROM {VERSION_TABLE} WHERE version = {}",
            file.version
        ),
    }
}

/// Convert a stored version, rejecting negative values.
pub fn stored_version(raw: i64) -> DbResult<Version> {
    Version::try_from(raw).map_err(|_| {
        DbError::StorageError(format!("{VERSION_TABLE} holds negative version {raw}"))
    })
}

#[cfg(test)]
#[path = "tracking_test.rs"]
mod tests;
