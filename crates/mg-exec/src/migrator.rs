//! Operation facade over catalog, planner, driver and executor.
//!
//! Plan-executing operations return a [`MigrationRun`] right away; the work
//! happens on a spawned task and reports through the progress channel.
//! `version`, `create` and `plan` are plain async calls returning a result.

use crate::error::{MigrateError, MigrateResult};
use crate::executor::Executor;
use crate::progress::{channel, ProgressEvent, ProgressReceiver, ProgressSender};
use mg_core::{plan, Catalog, DatabaseSettings, MigrationPair, Request, Schedule, Version};
use mg_db::{driver_for, driver_for_url, Driver};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Status line sent when a request has nothing to do
pub const NO_CHANGE: &str = "no change";

/// Migration operations against one database and migration directory
#[derive(Clone)]
pub struct Migrator {
    driver: Arc<dyn Driver>,
    url: String,
    dir: PathBuf,
}

impl std::fmt::Debug for Migrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrator")
            .field("driver", &self.driver.name())
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

/// A schedule computed without executing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DryRun {
    /// Version recorded in the database
    pub current: Version,
    /// Files that would run
    pub schedule: Schedule,
    /// Version after the schedule succeeds
    pub resulting: Version,
}

impl Migrator {
    /// Use an explicit driver.
    pub fn new(driver: Arc<dyn Driver>, url: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            driver,
            url: url.into(),
            dir: dir.into(),
        }
    }

    /// Pick the driver from the URL scheme.
    pub fn from_url(url: &str, dir: impl Into<PathBuf>) -> MigrateResult<Self> {
        let driver = driver_for_url(url).map_err(MigrateError::Connection)?;
        Ok(Self::new(driver, url, dir))
    }

    /// Build from configuration settings.
    pub fn from_settings(settings: &DatabaseSettings) -> MigrateResult<Self> {
        let driver = driver_for(settings.driver().map_err(MigrateError::Config)?)
            .map_err(MigrateError::Connection)?;
        let url = settings.connection_url().map_err(MigrateError::Config)?;
        let dir = settings.migration_dir().map_err(MigrateError::Config)?;
        Ok(Self::new(driver, url, dir))
    }

    /// Driver in use
    pub fn driver_name(&self) -> &'static str {
        self.driver.name()
    }

    /// Migration directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Apply `n` up files, or `|n|` down files when negative.
    pub fn migrate(&self, n: i64) -> MigrationRun {
        self.run(Request::Relative(n))
    }

    /// Apply every pending file.
    pub fn up(&self) -> MigrationRun {
        self.run(Request::Up)
    }

    /// Revert every applied file.
    pub fn down(&self) -> MigrationRun {
        self.run(Request::Down)
    }

    /// Revert everything, then apply everything.
    pub fn reset(&self) -> MigrationRun {
        self.run(Request::Reset)
    }

    /// Revert and re-apply the latest applied file.
    pub fn redo(&self) -> MigrationRun {
        self.run(Request::Redo)
    }

    /// Move to an absolute version.
    pub fn goto(&self, target: i64) -> MigrationRun {
        self.run(Request::Goto(target))
    }

    /// Start executing `request` on a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn run(&self, request: Request) -> MigrationRun {
        let (tx, rx) = channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(execute_request(
            Arc::clone(&self.driver),
            self.url.clone(),
            self.dir.clone(),
            request,
            tx,
            Arc::clone(&cancel),
        ));
        MigrationRun {
            events: rx,
            cancel,
            task: Some(task),
        }
    }

    /// Read the applied version.
    pub async fn version(&self) -> MigrateResult<Version> {
        let mut conn = self.driver.connect(&self.url).await?;
        let version = conn.version().await;
        let closed = conn.close().await;
        let version = version?;
        closed?;
        Ok(version)
    }

    /// Create an empty up/down pair after checking the database is reachable.
    pub async fn create(&self, name: &str) -> MigrateResult<MigrationPair> {
        let mut conn = self
            .driver
            .connect(&self.url)
            .await
            .map_err(MigrateError::Connection)?;
        conn.close().await.map_err(MigrateError::Connection)?;

        Ok(Catalog::create(
            &self.dir,
            name,
            self.driver.file_extension(),
        )?)
    }

    /// Compute what `request` would run, without running it.
    pub async fn plan(&self, request: Request) -> MigrateResult<DryRun> {
        let catalog = Catalog::scan(&self.dir, self.driver.file_extension())?;
        let mut conn = self.driver.connect(&self.url).await?;
        let current = conn.version().await;
        let closed = conn.close().await;
        let current = current?;
        closed?;

        let schedule = plan(current, &catalog, request)?;
        let resulting = schedule.resulting_version(&catalog, current);
        Ok(DryRun {
            current,
            schedule,
            resulting,
        })
    }
}

/// Discover, connect, plan and execute. Every failure becomes the terminal
/// progress event.
async fn execute_request(
    driver: Arc<dyn Driver>,
    url: String,
    dir: PathBuf,
    request: Request,
    progress: ProgressSender,
    cancel: Arc<AtomicBool>,
) {
    let catalog = match Catalog::scan(&dir, driver.file_extension()) {
        Ok(catalog) => catalog,
        Err(e) => return progress.fail(e.into()).await,
    };
    let mut conn = match driver.connect(&url).await {
        Ok(conn) => conn,
        Err(e) => return progress.fail(MigrateError::from_db(e)).await,
    };

    let schedule = match conn.version().await {
        Ok(current) => plan(current, &catalog, request).map_err(MigrateError::from),
        Err(e) => Err(MigrateError::from_db(e)),
    };
    let schedule = match schedule {
        Ok(schedule) => schedule,
        Err(e) => {
            let _ = conn.close().await;
            return progress.fail(e).await;
        }
    };

    if schedule.is_empty() {
        progress.info(NO_CHANGE).await;
    }
    Executor::new(cancel).run(conn, &schedule, progress).await;
}

/// Handle to a running plan execution
#[derive(Debug)]
pub struct MigrationRun {
    events: ProgressReceiver,
    cancel: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

/// Requests cancellation of a [`MigrationRun`] from elsewhere
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    /// Stop before the next file.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl MigrationRun {
    /// Stop before the next file. A file already running finishes.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// A cloneable handle for cancelling from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancel))
    }

    /// Next progress event; `None` when the run is over.
    pub async fn next_event(&mut self) -> Option<ProgressEvent> {
        self.events.recv().await
    }

    /// Consume every event and wait for the task. Returns true only when the
    /// run fully succeeded.
    pub async fn finish(mut self, mut on_event: impl FnMut(ProgressEvent)) -> bool {
        let ok = self.events.drain(&mut on_event).await;
        let Some(task) = self.task.take() else {
            return ok;
        };
        match task.await {
            Ok(()) => ok,
            Err(e) => {
                // the task died before reporting
                if ok {
                    on_event(ProgressEvent::Error(MigrateError::Task(e.to_string())));
                }
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
