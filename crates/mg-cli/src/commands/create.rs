//! Create command implementation

use anyhow::{Context, Result};

use crate::cli::{CreateArgs, GlobalArgs};
use crate::context::load_migrator;

/// Execute the create command
pub async fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let migrator = load_migrator(global)?;
    let name = args.name.join(" ");

    let pair = migrator
        .create(&name)
        .await
        .with_context(|| format!("Failed to create migration '{name}'"))?;

    println!(
        "Version {} migration files created in {}:",
        pair.version,
        migrator.dir().display()
    );
    println!("{}", pair.up.file_name);
    println!("{}", pair.down.file_name);
    Ok(())
}
