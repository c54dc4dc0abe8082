//! Error types for mg-exec

use mg_core::CoreError;
use mg_db::DbError;
use thiserror::Error;

/// Errors reported by a migration operation.
///
/// Every failure is terminal for the operation that raised it: synchronous
/// operations return it, plan executions deliver it as the last progress event.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Migration directory could not be read into a valid catalog (X001)
    #[error("[X001] Migration discovery failed: {0}")]
    Discovery(CoreError),

    /// Database unreachable, unknown driver or bad URL (X002)
    #[error("[X002] Connection failed: {0}")]
    Connection(DbError),

    /// Version record missing or corrupt (X003)
    #[error("[X003] Version storage failed: {0}")]
    Storage(DbError),

    /// A migration file failed to apply (X004)
    #[error("[X004] Migration '{file}' failed: {cause}")]
    Migration { file: String, cause: DbError },

    /// The request cannot be planned (X005)
    #[error("[X005] Invalid request: {0}")]
    Plan(CoreError),

    /// Filesystem failure while creating migration files (X006)
    #[error("[X006] I/O error: {0}")]
    Io(CoreError),

    /// Configuration is missing or invalid (X007)
    #[error("[X007] Configuration error: {0}")]
    Config(CoreError),

    /// The run was cancelled between files (X008)
    #[error("[X008] Migration cancelled")]
    Cancelled,

    /// The background run stopped without reporting (X009)
    #[error("[X009] Migration task failed: {0}")]
    Task(String),
}

impl MigrateError {
    /// Classify a core error.
    pub fn from_core(err: CoreError) -> Self {
        if err.is_discovery() {
            MigrateError::Discovery(err)
        } else if err.is_planning() {
            MigrateError::Plan(err)
        } else if err.is_io() {
            MigrateError::Io(err)
        } else {
            MigrateError::Config(err)
        }
    }

    /// Classify a driver error raised outside of applying a file.
    pub fn from_db(err: DbError) -> Self {
        if err.is_storage() {
            MigrateError::Storage(err)
        } else {
            MigrateError::Connection(err)
        }
    }

    /// A driver error raised while applying `file`.
    pub fn migration(file: &str, cause: DbError) -> Self {
        MigrateError::Migration {
            file: file.to_string(),
            cause,
        }
    }
}

impl From<CoreError> for MigrateError {
    fn from(err: CoreError) -> Self {
        Self::from_core(err)
    }
}

impl From<DbError> for MigrateError {
    fn from(err: DbError) -> Self {
        Self::from_db(err)
    }
}

/// Result type alias for MigrateError
pub type MigrateResult<T> = Result<T, MigrateError>;
