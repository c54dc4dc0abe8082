//! PostgreSQL driver

use crate::error::DbResult;
use crate::session;
use crate::traits::{strip_scheme, Connection, Driver};
use async_trait::async_trait;

/// Runs `.sql` migrations against PostgreSQL.
///
/// Each file and its version record commit in one transaction, so a failing
/// file leaves neither schema changes nor a version row behind.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDriver;

#[async_trait]
impl Driver for PostgresDriver {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn file_extension(&self) -> &'static str {
        "sql"
    }

    async fn connect(&self, url: &str) -> DbResult<Box<dyn Connection>> {
        strip_scheme(url, &["postgres", "postgresql"])?;
        session::connect(url, "postgres").await
    }
}
