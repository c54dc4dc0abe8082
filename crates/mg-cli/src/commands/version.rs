//! Version command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::context::load_migrator;

/// Print the applied version
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let migrator = load_migrator(global)?;
    let version = migrator
        .version()
        .await
        .context("Failed to read the applied version")?;
    println!("{version}");
    Ok(())
}
