//! Transactional application of a single DML migration
//!
//! The ledger row for the target version is inserted dirty and committed on
//! its own before anything else runs. The migration's statements, the flip
//! to clean, and the deletion of the previous row then commit together, so a
//! crash at any point leaves either the old state or a dirty marker behind.

use crate::error::{RunError, RunResult};
use mx_core::template::render_migration;
use mx_core::{parse_version, Track};
use mx_db::{ledger, Database, Statement};
use std::path::Path;

/// Apply the DML migration `migration` found in `dir`.
///
/// `current_version` is the data track's current ledger version; its row is
/// deleted when the migration commits. Returns the new current version.
pub async fn apply_dml_migration(
    db: &dyn Database,
    dir: &Path,
    current_version: i64,
    migration: &str,
) -> RunResult<i64> {
    log::info!(
        "Applying next DML migration '{}' from directory {}",
        migration,
        dir.display()
    );

    let next_version = parse_version(migration, Track::Data)?;
    let rendered = render_migration(dir, migration)?;

    ledger::checkpoint_dirty(db, Track::Data, next_version)
        .await
        .map_err(RunError::database(format!(
            "Failed inserting version {} in {} table as dirty",
            next_version,
            Track::Data.table_name()
        )))?;

    let mut statements: Vec<Statement> = rendered.into_iter().map(Statement::new).collect();
    statements.push(ledger::mark_clean(Track::Data, next_version));
    statements.push(ledger::prune(Track::Data, current_version));

    log::info!(
        "Applying DML migration from version {} to version {}: {} statements",
        current_version,
        next_version,
        statements.len()
    );

    let row_counts = db
        .run_transaction(&statements)
        .await
        .map_err(|source| RunError::DmlFailed {
            file: migration.to_string(),
            from: current_version,
            to: next_version,
            source,
        })?;

    log::info!(
        "Applied DML migration from version {} to version {}. Updated row counts {:?}",
        current_version,
        next_version,
        row_counts
    );
    Ok(next_version)
}

#[cfg(test)]
#[path = "dml_test.rs"]
mod tests;
