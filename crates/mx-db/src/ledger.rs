//! Migration ledger tables
//!
//! Each track has its own table of `(Version, Dirty)` rows. The row with the
//! highest version is the current one. A data migration inserts its version
//! as dirty before running, then in the same transaction as its statements
//! flips the row clean and deletes the previous current row.

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Statement, Value};
use mx_core::Track;

/// Last applied version of a track and whether it finished cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerState {
    pub dirty: bool,
    pub version: i64,
}

/// `CREATE TABLE` statement for a track's ledger.
pub fn create_table_sql(track: Track) -> String {
    format!(
        "CREATE TABLE {} (Version BIGINT NOT NULL, Dirty BOOLEAN NOT NULL, PRIMARY KEY (Version))",
        track.table_name()
    )
}

/// Create the ledger table for `track` unless it already exists.
pub async fn ensure_table(db: &dyn Database, track: Track) -> DbResult<()> {
    let table = track.table_name();
    log::info!("If necessary the '{}' table will be created", table);

    match db.update_ddl(&[create_table_sql(track)]).await {
        Ok(()) => {
            log::info!("Created the '{}' table", table);
            Ok(())
        }
        Err(e) if e.is_already_exists() => {
            log::debug!("'{}' table already exists", table);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Read the current row of a track's ledger.
///
/// An empty table is the initial state: version 0, not dirty.
pub async fn read_state(db: &dyn Database, track: Track) -> DbResult<LedgerState> {
    let table = track.table_name();
    let rows = db
        .query(&Statement::new(format!(
            "SELECT Dirty, Version FROM {} ORDER BY Version DESC LIMIT 1",
            table
        )))
        .await?;

    let Some(row) = rows.into_iter().next() else {
        log::info!("No existing migrations found in table '{}'", table);
        return Ok(LedgerState::default());
    };

    match row.as_slice() {
        [Value::Bool(dirty), Value::Int64(version)] => {
            log::info!(
                "Last migration in table '{}': {}{}",
                table,
                version,
                if *dirty { " (dirty)" } else { "" }
            );
            Ok(LedgerState {
                dirty: *dirty,
                version: *version,
            })
        }
        other => Err(DbError::UnexpectedRow {
            table: table.to_string(),
            message: format!("expected (Dirty BOOL, Version INT64), found {:?}", other),
        }),
    }
}

/// Whether the ledger table for `track` exists.
pub async fn table_exists(db: &dyn Database, track: Track) -> DbResult<bool> {
    let table = track.table_name();
    let rows = db
        .query(&Statement::with_params(
            "SELECT COUNT(*) FROM information_schema.tables WHERE lower(table_name) = lower(?)",
            vec![Value::Text(table.to_string())],
        ))
        .await?;

    match rows.as_slice() {
        [row] => match row.as_slice() {
            [Value::Int64(count)] => Ok(*count > 0),
            other => Err(DbError::UnexpectedRow {
                table: "information_schema.tables".to_string(),
                message: format!("expected COUNT(*), found {:?}", other),
            }),
        },
        _ => Err(DbError::UnexpectedRow {
            table: "information_schema.tables".to_string(),
            message: format!("expected one row, found {}", rows.len()),
        }),
    }
}

/// Read the current row without creating the table; a missing table is the
/// initial state.
pub async fn read_if_exists(db: &dyn Database, track: Track) -> DbResult<LedgerState> {
    if !table_exists(db, track).await? {
        log::info!("Table '{}' does not exist yet", track.table_name());
        return Ok(LedgerState::default());
    }
    read_state(db, track).await
}

/// Ensure the ledger table exists, then read its current row.
pub async fn load(db: &dyn Database, track: Track) -> DbResult<LedgerState> {
    ensure_table(db, track).await?;
    read_state(db, track).await
}

/// Insert `version` as an in-flight (dirty) row.
pub fn mark_dirty(track: Track, version: i64) -> Statement {
    Statement::with_params(
        format!("INSERT INTO {} (Dirty, Version) VALUES (?, ?)", track.table_name()),
        vec![Value::Bool(true), Value::Int64(version)],
    )
}

/// Mark `version` as cleanly applied.
pub fn mark_clean(track: Track, version: i64) -> Statement {
    Statement::with_params(
        format!("UPDATE {} SET Dirty = ? WHERE Version = ?", track.table_name()),
        vec![Value::Bool(false), Value::Int64(version)],
    )
}

/// Delete the superseded row for `version`.
pub fn prune(track: Track, version: i64) -> Statement {
    Statement::with_params(
        format!("DELETE FROM {} WHERE Version = ?", track.table_name()),
        vec![Value::Int64(version)],
    )
}

/// Record `version` as dirty in its own committed transaction.
pub async fn checkpoint_dirty(db: &dyn Database, track: Track, version: i64) -> DbResult<()> {
    log::info!(
        "Inserting version {} in '{}' table as dirty",
        version,
        track.table_name()
    );
    let counts = db.run_transaction(&[mark_dirty(track, version)]).await?;
    log::info!(
        "Inserted version {} in '{}' table as dirty. Updated row count {:?}",
        version,
        track.table_name(),
        counts
    );
    Ok(())
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
