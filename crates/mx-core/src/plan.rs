//! Outstanding-set resolution across the schema and data tracks
//!
//! DDL and DML versions live in separate ledgers but share one version line.
//! A file is outstanding when its version is past its own track's ledger; it
//! is inconsistent when it is also behind the other track's ledger.

use crate::error::{CoreError, CoreResult};
use crate::migration::MigrationFile;
use crate::track::Track;
use std::collections::HashMap;

/// Migrations still to be applied, per track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outstanding {
    /// Outstanding schema migrations
    pub ddl: Vec<MigrationFile>,

    /// Outstanding data migrations
    pub dml: Vec<MigrationFile>,
}

impl Outstanding {
    /// True when nothing is outstanding on either track.
    pub fn is_empty(&self) -> bool {
        self.ddl.is_empty() && self.dml.is_empty()
    }

    /// Total number of outstanding migrations.
    pub fn len(&self) -> usize {
        self.ddl.len() + self.dml.len()
    }

    /// Merge both tracks into a single execution order.
    pub fn execution_order(&self) -> Vec<MigrationFile> {
        let mut merged: Vec<MigrationFile> =
            self.ddl.iter().chain(self.dml.iter()).cloned().collect();
        merged.sort();
        merged
    }
}

/// Compute the outstanding migrations given the last applied version of each
/// track.
///
/// Fails on the first unparseable file name, on duplicate versions within a
/// track, and on any outstanding migration that is behind the other track's
/// last applied version.
pub fn resolve_outstanding(
    ddl: &[String],
    dml: &[String],
    last_ddl: i64,
    last_dml: i64,
) -> CoreResult<Outstanding> {
    log::info!("Determining outstanding DDL and DML migrations...");

    let outstanding = Outstanding {
        ddl: resolve_track(ddl, Track::Schema, last_ddl, last_dml)?,
        dml: resolve_track(dml, Track::Data, last_dml, last_ddl)?,
    };

    log::info!(
        "Found {} outstanding DDL migrations: {:?}",
        outstanding.ddl.len(),
        names(&outstanding.ddl)
    );
    log::info!(
        "Found {} outstanding DML migrations: {:?}",
        outstanding.dml.len(),
        names(&outstanding.dml)
    );

    Ok(outstanding)
}

fn resolve_track(
    files: &[String],
    track: Track,
    last_own: i64,
    last_other: i64,
) -> CoreResult<Vec<MigrationFile>> {
    let mut seen: HashMap<i64, &str> = HashMap::new();
    let mut outstanding = Vec::new();

    for name in files {
        let migration = MigrationFile::parse(name, track)?;

        if let Some(first) = seen.insert(migration.version, name) {
            return Err(CoreError::DuplicateVersion {
                track: track.to_string(),
                version: migration.version,
                first: first.to_string(),
                second: name.clone(),
            });
        }

        if migration.version <= last_own {
            continue;
        }
        if migration.version < last_other {
            return Err(CoreError::InconsistentState {
                track: track.to_string(),
                file: name.clone(),
                other_track: track.other().to_string(),
                other_version: last_other,
            });
        }
        outstanding.push(migration);
    }

    Ok(outstanding)
}

fn names(files: &[MigrationFile]) -> Vec<&str> {
    files.iter().map(|f| f.name.as_str()).collect()
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
