//! Plan-executing commands: migrate, up, down, reset, redo, goto

use anyhow::Result;
use mg_core::Request;
use mg_exec::{DryRun, MigrationRun, NO_CHANGE};
use std::time::Instant;

use crate::cli::{GlobalArgs, PlanArgs};
use crate::commands::common::ExitCode;
use crate::context::load_migrator;
use crate::output;

/// Execute `request` against the configured database
pub async fn execute(request: Request, args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let migrator = load_migrator(global)?;
    log::debug!("Request: {}", request);

    if args.dry_run {
        let dry = match migrator.plan(request).await {
            Ok(dry) => dry,
            Err(err) => {
                output::error(&err.to_string());
                return Err(ExitCode(1).into());
            }
        };
        render_dry_run(&dry);
        return Ok(());
    }

    let start_time = Instant::now();
    let ok = watch(migrator.run(request)).await;
    output::elapsed(start_time.elapsed());

    if ok {
        Ok(())
    } else {
        Err(ExitCode(1).into())
    }
}

/// Render events until the run ends, cancelling on Ctrl-C.
async fn watch(run: MigrationRun) -> bool {
    let cancel = run.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, stopping after the current migration");
            cancel.cancel();
        }
    });

    let ok = run.finish(output::event).await;
    interrupt.abort();
    ok
}

fn render_dry_run(dry: &DryRun) {
    println!("Current version: {}", dry.current);
    if dry.schedule.is_empty() {
        println!("{NO_CHANGE}");
        return;
    }
    for file in dry.schedule.files() {
        output::applied(file);
    }
    println!("Would end at version: {}", dry.resulting);
}
