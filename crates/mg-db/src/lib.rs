//! mg-db - Driver layer for migrato
//!
//! This crate provides the [`Driver`] and [`Connection`] traits the executor
//! runs against, the `schema_migrations` version bookkeeping shared by the
//! SQL backends, and implementations for DuckDB, PostgreSQL, MySQL, SQLite
//! and plain bash scripts.

pub mod bash;
pub mod duckdb;
pub mod error;
pub mod mysql;
pub mod postgres;
pub mod registry;
mod session;
pub mod sqlite;
pub mod tracking;
pub mod traits;

pub use bash::BashDriver;
pub use duckdb::DuckDbDriver;
pub use error::{DbError, DbResult};
pub use mysql::MySqlDriver;
pub use postgres::PostgresDriver;
pub use registry::{driver_for, driver_for_url, scheme_of, DRIVER_NAMES};
pub use sqlite::SqliteDriver;
pub use traits::{Connection, Driver};
