//! migrato CLI - versioned database schema migrations

use anyhow::Result;
use clap::Parser;
use mg_core::Request;

mod cli;
mod commands;
mod context;
mod output;

use cli::{Cli, Commands};
use commands::common::ExitCode;
use commands::{apply, create, version};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match &cli.command {
        Commands::Create(args) => create::execute(args, &cli.global).await,
        Commands::Migrate(args) => {
            apply::execute(Request::Relative(args.n), &args.plan, &cli.global).await
        }
        Commands::Up(args) => apply::execute(Request::Up, args, &cli.global).await,
        Commands::Down(args) => apply::execute(Request::Down, args, &cli.global).await,
        Commands::Reset(args) => apply::execute(Request::Reset, args, &cli.global).await,
        Commands::Redo(args) => apply::execute(Request::Redo, args, &cli.global).await,
        Commands::Goto(args) => {
            apply::execute(Request::Goto(args.version), &args.plan, &cli.global).await
        }
        Commands::Version => version::execute(&cli.global).await,
    };

    if let Err(err) = result {
        let code = match err.downcast_ref::<ExitCode>() {
            Some(ec) => ec.0,
            None => {
                output::error(&format!("{err:#}"));
                1
            }
        };
        std::process::exit(code);
    }
    Ok(())
}
