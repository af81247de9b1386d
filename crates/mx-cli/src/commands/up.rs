//! Up command implementation

use anyhow::{Context, Result};
use mx_runner::{MigrateCli, Orchestrator, RunContext};

use crate::cli::{GlobalArgs, UpArgs};
use crate::commands::common;

/// Execute the up command
pub(crate) async fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let mut config = common::load_config(global)?;
    if let Some(minutes) = args.timeout_minutes {
        config.timeout_minutes = minutes;
    }
    if let Some(bin) = &args.schema_tool {
        config.schema_tool.bin = bin.clone();
    }
    if let Some(url) = &args.schema_tool_database_url {
        config.schema_tool.database_url = Some(url.clone());
    }
    let config = common::finish_config(config)?;

    let ctx = RunContext::new(config.timeout());
    let watcher = ctx.watch_signals();

    let schema_tool = MigrateCli::from_config(&config);
    let orchestrator = Orchestrator::new(&config, &schema_tool, &ctx);
    let result = ctx.run(orchestrator.run(common::connector(&config))).await;

    // Stops the signal watcher
    ctx.cancel();
    if let Err(e) = watcher.await {
        log::debug!("Signal watcher ended abnormally: {}", e);
    }

    let outcome = result.context("Migration failed")?;
    log::info!("Migration complete: {}", outcome);
    Ok(())
}
