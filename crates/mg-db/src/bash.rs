//! Shell-script driver
//!
//! Migrations are `.sh` files run with `bash`. There is no database: applied
//! versions are kept one per line in a plain state file named by the URL
//! (`bash://<state-file>`). Scripts see `MIGRATE_DIRECTION` (`up`/`down`) and
//! `MIGRATE_VERSION` in their environment.

use crate::error::{DbError, DbResult};
use crate::traits::{strip_scheme, Connection, Driver};
use async_trait::async_trait;
use mg_core::{Direction, MigrationFile, Version};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Runs `.sh` migrations and tracks versions in a state file.
#[derive(Debug, Default, Clone, Copy)]
pub struct BashDriver;

#[async_trait]
impl Driver for BashDriver {
    fn name(&self) -> &'static str {
        "bash"
    }

    fn file_extension(&self) -> &'static str {
        "sh"
    }

    async fn connect(&self, url: &str) -> DbResult<Box<dyn Connection>> {
        let path = strip_scheme(url, &["bash"])?;
        if path.is_empty() {
            return Err(DbError::InvalidUrl {
                url: url.to_string(),
                reason: "missing state file path".to_string(),
            });
        }
        let conn = BashConnection::open(PathBuf::from(path)).await?;
        Ok(Box::new(conn))
    }
}

/// Applied versions backed by a state file
pub struct BashConnection {
    state_file: PathBuf,
    applied: BTreeSet<Version>,
    open: bool,
}

impl BashConnection {
    /// Load the state file, creating an empty one when absent.
    pub async fn open(state_file: PathBuf) -> DbResult<Self> {
        let applied = match tokio::fs::read_to_string(&state_file).await {
            Ok(content) => parse_state(&state_file, &content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tokio::fs::write(&state_file, "").await.map_err(|e| {
                    DbError::StorageError(format!(
                        "cannot create state file {}: {e}",
                        state_file.display()
                    ))
                })?;
                BTreeSet::new()
            }
            Err(e) => {
                return Err(DbError::ConnectionError(format!(
                    "cannot read state file {}: {e}",
                    state_file.display()
                )))
            }
        };
        log::debug!(
            "Loaded {} applied versions from {}",
            applied.len(),
            state_file.display()
        );
        Ok(Self {
            state_file,
            applied,
            open: true,
        })
    }

    fn ensure_open(&self) -> DbResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(crate::traits::closed())
        }
    }

    async fn save(&self) -> DbResult<()> {
        let content: String = self.applied.iter().map(|v| format!("{v}\n")).collect();
        tokio::fs::write(&self.state_file, content)
            .await
            .map_err(|e| {
                DbError::StorageError(format!(
                    "cannot write state file {}: {e}",
                    self.state_file.display()
                ))
            })
    }
}

fn parse_state(path: &Path, content: &str) -> DbResult<BTreeSet<Version>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.parse::<Version>().map_err(|_| {
                DbError::StorageError(format!(
                    "state file {} has invalid entry '{line}'",
                    path.display()
                ))
            })
        })
        .collect()
}

#[async_trait]
impl Connection for BashConnection {
    async fn version(&mut self) -> DbResult<Version> {
        self.ensure_open()?;
        Ok(self.applied.last().copied().unwrap_or(Version::ZERO))
    }

    async fn apply(&mut self, file: &MigrationFile) -> DbResult<()> {
        self.ensure_open()?;
        let output = Command::new("bash")
            .arg(&file.path)
            .env("MIGRATE_DIRECTION", file.direction.to_string())
            .env("MIGRATE_VERSION", file.version.to_string())
            .output()
            .await
            .map_err(|e| {
                DbError::ExecutionError(format!("{}: cannot run bash: {e}", file.file_name))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(DbError::ExecutionError(format!(
                "{} exited with {code}: {}",
                file.file_name,
                stderr.trim()
            )));
        }

        match file.direction {
            Direction::Up => self.applied.insert(file.version),
            Direction::Down => self.applied.remove(&file.version),
        };
        self.save().await
    }

    async fn close(&mut self) -> DbResult<()> {
        self.ensure_open()?;
        self.open = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "bash_test.rs"]
mod tests;
