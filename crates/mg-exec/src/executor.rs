//! Plan execution
//!
//! The [`Executor`] owns one open connection for the length of a run. It
//! applies files in schedule order, reports each success on the progress
//! channel and stops at the first failure. Whatever the outcome, the
//! connection is closed and then the channel.

use crate::error::{MigrateError, MigrateResult};
use crate::progress::ProgressSender;
use mg_core::Schedule;
use mg_db::Connection;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle of one executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Runs a [`Schedule`] against one connection
#[derive(Debug)]
pub struct Executor {
    state: ExecutorState,
    cancel: Arc<AtomicBool>,
}

impl Executor {
    /// Create an idle executor observing `cancel` between files.
    pub fn new(cancel: Arc<AtomicBool>) -> Self {
        Self {
            state: ExecutorState::Idle,
            cancel,
        }
    }

    /// Current state
    pub fn state(&self) -> ExecutorState {
        self.state
    }

    /// Apply every phase of `schedule`, then close `conn` and `progress`.
    ///
    /// Phases run back to back on the same connection; a failure in one phase
    /// means later phases never start.
    pub async fn run(
        &mut self,
        mut conn: Box<dyn Connection>,
        schedule: &Schedule,
        progress: ProgressSender,
    ) -> ExecutorState {
        self.state = ExecutorState::Running;

        let applied = self.apply_all(conn.as_mut(), schedule, &progress).await;
        let closed = conn.close().await.map_err(MigrateError::from_db);

        match applied.and(closed) {
            Ok(()) => {
                self.state = ExecutorState::Completed;
                drop(progress);
            }
            Err(err) => {
                self.state = ExecutorState::Failed;
                progress.fail(err).await;
            }
        }
        self.state
    }

    async fn apply_all(
        &self,
        conn: &mut dyn Connection,
        schedule: &Schedule,
        progress: &ProgressSender,
    ) -> MigrateResult<()> {
        for plan in schedule.phases() {
            for file in plan.files() {
                if self.cancel.load(Ordering::SeqCst) {
                    return Err(MigrateError::Cancelled);
                }
                conn.apply(file)
                    .await
                    .map_err(|e| MigrateError::migration(&file.file_name, e))?;
                // consumer gone: stop like a cancel
                if !progress.file_applied(file.clone()).await {
                    return Err(MigrateError::Cancelled);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
