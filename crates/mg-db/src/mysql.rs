//! MySQL driver

use crate::error::DbResult;
use crate::session;
use crate::traits::{strip_scheme, Connection, Driver};
use async_trait::async_trait;

/// Runs `.sql` migrations against MySQL.
///
/// MySQL commits DDL implicitly, so a failing file may leave earlier
/// statements applied; the version row is only written after the file runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDriver;

/// Rewrite a `user:pass@tcp(host:port)/db` DSN into URL form.
pub fn normalize_url(url: &str) -> String {
    let Some(start) = url.find("@tcp(") else {
        return url.to_string();
    };
    let host_start = start + "@tcp(".len();
    match url[host_start..].find(')') {
        Some(len) => format!(
            "{}@{}{}",
            &url[..start],
            &url[host_start..host_start + len],
            &url[host_start + len + 1..]
        ),
        None => url.to_string(),
    }
}

#[async_trait]
impl Driver for MySqlDriver {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn file_extension(&self) -> &'static str {
        "sql"
    }

    async fn connect(&self, url: &str) -> DbResult<Box<dyn Connection>> {
        strip_scheme(url, &["mysql"])?;
        session::connect(&normalize_url(url), "mysql").await
    }
}

#[cfg(test)]
#[path = "mysql_test.rs"]
mod tests;
