//! Migration planning.
//!
//! [`plan`] is a pure function of the applied version, the catalog and a
//! [`Request`]. It produces a [`Schedule`]: one or more single-direction
//! [`Plan`]s that are executed back to back. Composite requests (reset, redo)
//! keep their phases separate so that a failure in the first phase stops
//! before the second begins.

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::migration::{Direction, MigrationFile};
use crate::version::Version;
use std::fmt;

/// What the caller wants done to the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Apply `n` up files (n > 0) or `|n|` down files (n < 0)
    Relative(i64),
    /// Apply every pending up file
    Up,
    /// Revert every applied file
    Down,
    /// Move to an absolute version
    Goto(i64),
    /// Down everything, then up everything
    Reset,
    /// Revert the latest applied file and apply it again
    Redo,
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Relative(n) => write!(f, "migrate {n:+}"),
            Request::Up => f.write_str("up"),
            Request::Down => f.write_str("down"),
            Request::Goto(v) => write!(f, "goto {v}"),
            Request::Reset => f.write_str("reset"),
            Request::Redo => f.write_str("redo"),
        }
    }
}

/// Ordered files to run in one direction.
///
/// Up plans are strictly ascending by version, down plans strictly descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    direction: Direction,
    files: Vec<MigrationFile>,
}

impl Plan {
    fn collect<'a>(direction: Direction, files: impl Iterator<Item = &'a MigrationFile>) -> Self {
        Self {
            direction,
            files: files.cloned().collect(),
        }
    }

    /// Direction shared by every file
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Files in execution order
    pub fn files(&self) -> &[MigrationFile] {
        &self.files
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether there is nothing to run
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Sequence of plans for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    phases: Vec<Plan>,
}

impl Schedule {
    fn push(&mut self, plan: Plan) {
        if !plan.is_empty() {
            self.phases.push(plan);
        }
    }

    fn single(plan: Plan) -> Self {
        let mut schedule = Self::default();
        schedule.push(plan);
        schedule
    }

    /// Non-empty phases in execution order
    pub fn phases(&self) -> &[Plan] {
        &self.phases
    }

    /// Every file across all phases, in execution order
    pub fn files(&self) -> impl Iterator<Item = &MigrationFile> {
        self.phases.iter().flat_map(|p| p.files.iter())
    }

    /// Total number of files
    pub fn len(&self) -> usize {
        self.phases.iter().map(Plan::len).sum()
    }

    /// Whether there is nothing to run
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// The applied version after the whole schedule succeeds.
    pub fn resulting_version(&self, catalog: &Catalog, current: Version) -> Version {
        match self.files().last() {
            Some(file) if file.direction == Direction::Up => file.version,
            Some(file) => catalog.previous_version(file.version),
            None => current,
        }
    }
}

fn clamp_count(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

fn relative(current: Version, catalog: &Catalog, n: i64) -> Plan {
    let take = clamp_count(n.unsigned_abs());
    if n > 0 {
        Plan::collect(Direction::Up, catalog.pending_up(current).take(take))
    } else {
        Plan::collect(Direction::Down, catalog.applied_down(current).take(take))
    }
}

/// Compute the schedule for `request` starting from `current`.
pub fn plan(current: Version, catalog: &Catalog, request: Request) -> CoreResult<Schedule> {
    match request {
        Request::Relative(0) => Ok(Schedule::default()),
        Request::Relative(n) => Ok(Schedule::single(relative(current, catalog, n))),
        Request::Up => Ok(Schedule::single(Plan::collect(
            Direction::Up,
            catalog.pending_up(current),
        ))),
        Request::Down => Ok(Schedule::single(Plan::collect(
            Direction::Down,
            catalog.applied_down(current),
        ))),
        Request::Goto(target) => goto(current, catalog, target),
        Request::Reset => {
            let mut schedule = Schedule::default();
            schedule.push(Plan::collect(
                Direction::Down,
                catalog.applied_down(current),
            ));
            schedule.push(Plan::collect(
                Direction::Up,
                catalog.pending_up(Version::ZERO),
            ));
            Ok(schedule)
        }
        Request::Redo => redo(current, catalog),
    }
}

/// Goto is a relative move of `target - current`, bounded so that the plan
/// never steps past `target` when versions are sparse.
fn goto(current: Version, catalog: &Catalog, target: i64) -> CoreResult<Schedule> {
    let target = Version::try_from(target).map_err(|_| CoreError::InvalidTarget { target })?;
    let n = current.delta_to(target);
    let take = clamp_count(n.unsigned_abs());

    let plan = if n > 0 {
        Plan::collect(
            Direction::Up,
            catalog
                .pending_up(current)
                .take(take)
                .take_while(|f| f.version <= target),
        )
    } else if n < 0 {
        Plan::collect(
            Direction::Down,
            catalog
                .applied_down(current)
                .take(take)
                .take_while(|f| f.version > target),
        )
    } else {
        return Ok(Schedule::default());
    };
    Ok(Schedule::single(plan))
}

fn redo(current: Version, catalog: &Catalog) -> CoreResult<Schedule> {
    if current.is_zero() {
        return Err(CoreError::NoMigrationsApplied);
    }
    let down = catalog
        .applied_down(current)
        .next()
        .ok_or(CoreError::NoMigrationsApplied)?;
    let pair = catalog
        .get(down.version)
        .ok_or(CoreError::NoMigrationsApplied)?;

    let mut schedule = Schedule::default();
    schedule.push(Plan::collect(Direction::Down, std::iter::once(&pair.down)));
    schedule.push(Plan::collect(Direction::Up, std::iter::once(&pair.up)));
    Ok(schedule)
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
