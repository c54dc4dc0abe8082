//! Error types for mg-db

use thiserror::Error;

/// Driver errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Cannot reach or authenticate to the database (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// A migration file failed to execute (D002)
    #[error("[D002] Migration execution failed: {0}")]
    ExecutionError(String),

    /// The version-tracking record is missing or corrupt (D003)
    #[error("[D003] Version tracking storage failed: {0}")]
    StorageError(String),

    /// No driver with this identifier (D004)
    #[error("[D004] Unknown driver '{0}'")]
    UnknownDriver(String),

    /// Connection URL cannot be used (D005)
    #[error("[D005] Invalid connection URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Migration file could not be read (D006)
    #[error("[D006] Failed to read '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },
}

impl DbError {
    /// True when the database itself could not be reached.
    pub fn is_connection(&self) -> bool {
        matches!(
            self,
            DbError::ConnectionError(_) | DbError::UnknownDriver(_) | DbError::InvalidUrl { .. }
        )
    }

    /// True when the version record is unusable.
    pub fn is_storage(&self) -> bool {
        matches!(self, DbError::StorageError(_))
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(e) => DbError::ConnectionError(e.to_string()),
            sqlx::Error::Io(e) => DbError::ConnectionError(e.to_string()),
            sqlx::Error::Tls(e) => DbError::ConnectionError(e.to_string()),
            sqlx::Error::Protocol(e) => DbError::ConnectionError(e),
            other => DbError::ExecutionError(other.to_string()),
        }
    }
}
