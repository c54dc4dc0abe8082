//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use mg_core::config::{DEFAULT_DEF_PATH, DEFAULT_ENV_PATH, DEFAULT_SECTION};

/// migrato - versioned database schema migrations
#[derive(Parser, Debug)]
#[command(name = "migrato")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults config file
    #[arg(long, global = true, env = "MIGRATO_DEF", default_value = DEFAULT_DEF_PATH)]
    pub def: String,

    /// Environment config file, merged over the defaults
    #[arg(long = "env", global = true, env = "MIGRATO_ENV", default_value = DEFAULT_ENV_PATH)]
    pub env_file: String,

    /// Config section holding the database settings
    #[arg(long, global = true, env = "MIGRATO_SECTION", default_value = DEFAULT_SECTION)]
    pub section: String,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new empty up/down migration pair
    Create(CreateArgs),

    /// Apply N up migrations, or revert N when negative
    Migrate(MigrateArgs),

    /// Apply all pending migrations
    Up(PlanArgs),

    /// Revert all applied migrations
    Down(PlanArgs),

    /// Revert everything, then apply everything
    Reset(PlanArgs),

    /// Revert and re-apply the latest migration
    Redo(PlanArgs),

    /// Migrate up or down to a specific version
    Goto(GotoArgs),

    /// Print the applied version
    Version,
}

/// Options shared by commands that execute a plan
#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    /// Print the files that would run without running them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Migration name; words are joined with underscores
    #[arg(required = true, num_args = 1..)]
    pub name: Vec<String>,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Number of migrations; negative to revert
    #[arg(allow_negative_numbers = true)]
    pub n: i64,

    #[command(flatten)]
    pub plan: PlanArgs,
}

/// Arguments for the goto command
#[derive(Args, Debug)]
pub struct GotoArgs {
    /// Target version
    #[arg(allow_negative_numbers = true)]
    pub version: i64,

    #[command(flatten)]
    pub plan: PlanArgs,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
