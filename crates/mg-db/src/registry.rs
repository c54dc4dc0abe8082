//! Driver lookup by identifier or URL scheme

use crate::bash::BashDriver;
use crate::duckdb::DuckDbDriver;
use crate::error::{DbError, DbResult};
use crate::mysql::MySqlDriver;
use crate::postgres::PostgresDriver;
use crate::sqlite::SqliteDriver;
use crate::traits::Driver;
use std::sync::Arc;

/// Identifiers accepted by [`driver_for`]
pub const DRIVER_NAMES: &[&str] = &[
    "duckdb",
    "postgres",
    "postgresql",
    "mysql",
    "sqlite3",
    "sqlite",
    "bash",
];

/// Resolve a driver identifier.
pub fn driver_for(name: &str) -> DbResult<Arc<dyn Driver>> {
    let driver: Arc<dyn Driver> = match name {
        "duckdb" => Arc::new(DuckDbDriver),
        "postgres" | "postgresql" => Arc::new(PostgresDriver),
        "mysql" => Arc::new(MySqlDriver),
        "sqlite3" | "sqlite" => Arc::new(SqliteDriver),
        "bash" => Arc::new(BashDriver),
        other => return Err(DbError::UnknownDriver(other.to_string())),
    };
    Ok(driver)
}

/// The scheme of a `<scheme>://...` URL.
pub fn scheme_of(url: &str) -> DbResult<&str> {
    match url.split_once("://") {
        Some((scheme, _)) if !scheme.is_empty() => Ok(scheme),
        _ => Err(DbError::InvalidUrl {
            url: url.to_string(),
            reason: "expected <driver>://...".to_string(),
        }),
    }
}

/// Resolve the driver named by a URL's scheme.
pub fn driver_for_url(url: &str) -> DbResult<Arc<dyn Driver>> {
    driver_for(scheme_of(url)?)
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
