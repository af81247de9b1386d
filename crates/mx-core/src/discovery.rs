//! Discovery and classification of migration files
//!
//! File names decide everything here: `.ddl.up.sql` files belong to the schema
//! track, `.dml.sql` files belong to the data track when they are tagged for
//! every environment (`.all.`) or for the current one.

use crate::error::{CoreError, CoreResult};
use crate::track::Track;
use std::path::Path;

/// Suffix of schema (DDL) migrations.
pub const DDL_SUFFIX: &str = ".ddl.up.sql";

/// Suffix of data (DML) migrations that apply to every environment.
pub const DML_ALL_SUFFIX: &str = ".all.dml.sql";

/// Common suffix of every data (DML) migration.
pub const DML_SUFFIX: &str = ".dml.sql";

/// Migration file names found in a directory, split by track.
///
/// Both lists keep directory order (sorted by file name).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    /// Schema migration file names
    pub ddl: Vec<String>,

    /// Data migration file names applicable to the current environment
    pub dml: Vec<String>,
}

impl Discovered {
    /// True when neither track has any migration.
    pub fn is_empty(&self) -> bool {
        self.ddl.is_empty() && self.dml.is_empty()
    }
}

/// Classify a single file name for the environment `env_id`.
///
/// First match wins; `None` means the file is not a migration for this
/// environment.
pub fn classify(name: &str, env_id: &str) -> Option<Track> {
    if name.ends_with(DDL_SUFFIX) {
        return Some(Track::Schema);
    }
    if name.ends_with(DML_ALL_SUFFIX) {
        return Some(Track::Data);
    }
    if name.ends_with(&format!(".{}{}", env_id, DML_SUFFIX)) {
        return Some(Track::Data);
    }
    if name.ends_with(DML_SUFFIX) && name.contains(&format!(".{}.", env_id)) {
        return Some(Track::Data);
    }
    None
}

/// List `dir` and classify every regular file in it.
///
/// An empty directory is not an error; an unreadable one is.
pub fn discover(dir: &Path, env_id: &str) -> CoreResult<Discovered> {
    log::info!("Determining migrations...");

    let unreadable = |source| CoreError::DirectoryUnreadable {
        path: dir.display().to_string(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        if !entry.file_type().map_err(unreadable)?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => log::warn!("Skipping non UTF-8 file name {:?}", raw),
        }
    }
    names.sort();

    if names.is_empty() {
        log::debug!("Found no files in directory {}", dir.display());
    }

    let mut discovered = Discovered::default();
    for name in names {
        log::debug!("Found file '{}'", name);
        match classify(&name, env_id) {
            Some(Track::Schema) => discovered.ddl.push(name),
            Some(Track::Data) => discovered.dml.push(name),
            None => {}
        }
    }

    log::info!(
        "Found {} DDL migrations: {:?}",
        discovered.ddl.len(),
        discovered.ddl
    );
    log::info!(
        "Found {} DML migrations: {:?}",
        discovered.dml.len(),
        discovered.dml
    );

    Ok(discovered)
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
