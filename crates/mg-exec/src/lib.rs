//! mg-exec - Migration execution for migrato
//!
//! Ties the catalog and planner from `mg-core` to a driver from `mg-db`:
//! the [`Executor`] applies a schedule on one connection, the progress
//! channel carries its events to the caller, and [`Migrator`] exposes the
//! user-facing operations.

pub mod error;
pub mod executor;
pub mod migrator;
pub mod progress;

pub use error::{MigrateError, MigrateResult};
pub use executor::{Executor, ExecutorState};
pub use migrator::{CancelHandle, DryRun, MigrationRun, Migrator, NO_CHANGE};
pub use progress::{channel, ProgressEvent, ProgressReceiver, ProgressSender, CHANNEL_CAPACITY};
