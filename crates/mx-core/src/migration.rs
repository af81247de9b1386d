//! Migration file names and their version prefixes

use crate::error::{CoreError, CoreResult};
use crate::track::Track;
use std::cmp::Ordering;
use std::fmt;

/// A discovered migration file with its parsed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// File name relative to the migrations directory
    pub name: String,

    /// Version prefix parsed from the file name
    pub version: i64,

    /// Ledger this migration is tracked in
    pub track: Track,
}

impl MigrationFile {
    /// Parse the version of `name` and pair it with its track.
    pub fn parse(name: &str, track: Track) -> CoreResult<Self> {
        Ok(Self {
            name: name.to_string(),
            version: parse_version(name, track)?,
            track,
        })
    }
}

/// Execution order: numeric version first, file name to break ties.
///
/// Sorting by the parsed number keeps `10_x` after `9_y` even when the
/// prefixes are not zero-padded.
impl Ord for MigrationFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for MigrationFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MigrationFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Extract the version from a `<version>_<description>.<suffix>` file name.
///
/// Everything before the first `_` must be a positive base-10 `i64`.
pub fn parse_version(name: &str, track: Track) -> CoreResult<i64> {
    let prefix = name.split_once('_').map_or(name, |(prefix, _)| prefix);

    let invalid = |reason: String| CoreError::InvalidVersion {
        track: track.to_string(),
        file: name.to_string(),
        reason,
    };

    let version: i64 = prefix
        .parse()
        .map_err(|e| invalid(format!("prefix '{}' is not an integer: {}", prefix, e)))?;

    if version <= 0 {
        return Err(invalid(format!("version {} is not positive", version)));
    }
    Ok(version)
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
