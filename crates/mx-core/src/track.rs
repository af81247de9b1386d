//! Migration tracks and their ledger tables

use std::fmt;

/// Which ledger a migration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Track {
    /// Schema changes, applied by the external DDL tool
    Schema,
    /// Data changes, applied by migratex inside a transaction
    Data,
}

impl Track {
    /// Name of the ledger table backing this track.
    pub fn table_name(self) -> &'static str {
        match self {
            Track::Schema => "SchemaMigrations",
            Track::Data => "DataMigrations",
        }
    }

    /// The opposite track, used for cross-track ordering checks.
    pub fn other(self) -> Track {
        match self {
            Track::Schema => Track::Data,
            Track::Data => Track::Schema,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Track::Schema => write!(f, "DDL"),
            Track::Data => write!(f, "DML"),
        }
    }
}
