//! Status command implementation

use anyhow::{Context, Result};
use mx_core::Track;
use mx_db::LedgerState;
use mx_runner::{read_status, RunContext, Status};
use std::collections::HashSet;
use std::fmt::Write;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common;

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let config = common::finish_config(common::load_config(global)?)?;

    let ctx = RunContext::new(config.timeout());
    let status = ctx
        .run(read_status(&config, common::connector(&config)))
        .await
        .context("Failed to read migration status")?;

    print!("{}", render_status(&status, args.all));
    Ok(())
}

fn ledger_line(track: Track, state: &LedgerState) -> String {
    let mut line = format!("{:<18} version {}", track.table_name(), state.version);
    if state.dirty {
        line.push_str(" (dirty, must be manually fixed)");
    }
    line
}

/// Human-readable status report.
pub(crate) fn render_status(status: &Status, all: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", ledger_line(Track::Schema, &status.schema));
    let _ = writeln!(out, "{}", ledger_line(Track::Data, &status.data));
    let _ = writeln!(out);

    let Some(outstanding) = &status.outstanding else {
        let _ = writeln!(out, "Outstanding migrations unknown while a ledger is dirty");
        return out;
    };

    if all {
        let pending: HashSet<&str> = outstanding
            .ddl
            .iter()
            .chain(outstanding.dml.iter())
            .map(|m| m.name.as_str())
            .collect();
        let mut names: Vec<(&str, Track)> = status
            .discovered
            .ddl
            .iter()
            .map(|n| (n.as_str(), Track::Schema))
            .chain(status.discovered.dml.iter().map(|n| (n.as_str(), Track::Data)))
            .collect();
        names.sort();

        let _ = writeln!(out, "Discovered migrations ({}):", names.len());
        for (name, track) in names {
            let state = if pending.contains(name) {
                "pending"
            } else {
                "applied"
            };
            let _ = writeln!(out, "  {:<8} {}  {}", state, track, name);
        }
        let _ = writeln!(out);
    }

    if outstanding.is_empty() {
        let _ = writeln!(out, "No outstanding migrations");
        return out;
    }

    let _ = writeln!(out, "Outstanding migrations ({}):", outstanding.len());
    for migration in outstanding.execution_order() {
        let _ = writeln!(out, "  {}  {}", migration.track, migration.name);
    }
    out
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;
