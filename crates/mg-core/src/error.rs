//! Error types for mg-core

use crate::migration::Direction;
use crate::version::Version;
use thiserror::Error;

/// Core error type for migrato
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Migration file name does not follow the naming convention
    #[error("[C001] Invalid migration file name '{file}': {reason}")]
    InvalidFileName { file: String, reason: String },

    /// C002: A version has only one of its up/down files
    #[error("[C002] Migration {version} is missing its {missing} file (found only {present})")]
    IncompletePair {
        version: Version,
        missing: Direction,
        present: String,
    },

    /// C003: Two files claim the same version and direction
    #[error("[C003] Duplicate {direction} migration for version {version}: '{first}' and '{second}'")]
    DuplicateVersion {
        version: Version,
        direction: Direction,
        first: String,
        second: String,
    },

    /// C004: Up and down files of one version disagree on the name
    #[error("[C004] Migration {version} has mismatched names: up '{up}', down '{down}'")]
    PairNameMismatch {
        version: Version,
        up: String,
        down: String,
    },

    /// C005: Migration directory not found
    #[error("[C005] Migration directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// C006: Name given to `create` cannot be used in a file name
    #[error("[C006] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// C007: Goto target below zero
    #[error("[C007] Invalid target version {target}: must be >= 0")]
    InvalidTarget { target: i64 },

    /// C008: Redo requested with nothing applied
    #[error("[C008] No migrations applied")]
    NoMigrationsApplied,

    /// C009: Configuration file not found
    #[error("[C009] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C010: Configuration could not be parsed
    #[error("[C010] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// C011: Configuration is missing or has invalid values
    #[error("[C011] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C012: IO error
    #[error("[C012] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// C013: IO error with file path context
    #[error("[C013] IO error on '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C014: YAML parse error
    #[error("[C014] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

impl CoreError {
    /// True for errors raised while reading the migration directory.
    pub fn is_discovery(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidFileName { .. }
                | CoreError::IncompletePair { .. }
                | CoreError::DuplicateVersion { .. }
                | CoreError::PairNameMismatch { .. }
                | CoreError::DirectoryNotFound { .. }
        )
    }

    /// True for request errors detected while planning.
    pub fn is_planning(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidTarget { .. } | CoreError::NoMigrationsApplied
        )
    }

    /// True for filesystem failures.
    pub fn is_io(&self) -> bool {
        matches!(self, CoreError::Io(_) | CoreError::IoWithPath { .. })
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
