//! Shared utilities for CLI commands

use std::fmt;

/// Error type representing a non-zero process exit code.
///
/// The failure has already been reported; `main` only sets the exit status.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}
