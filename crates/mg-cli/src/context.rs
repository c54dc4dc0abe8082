//! Runtime context for CLI commands

use anyhow::{Context, Result};
use mg_core::DatabaseSettings;
use mg_exec::Migrator;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Load the configured database section and build a [`Migrator`] for it.
pub fn load_migrator(global: &GlobalArgs) -> Result<Migrator> {
    let settings = DatabaseSettings::load(
        Path::new(&global.def),
        Path::new(&global.env_file),
        &global.section,
    )
    .context("Failed to load database configuration")?;

    let migrator = Migrator::from_settings(&settings)
        .context("Failed to set up the configured database driver")?;
    log::debug!(
        "Using {} driver with migrations in {}",
        migrator.driver_name(),
        migrator.dir().display()
    );
    Ok(migrator)
}
