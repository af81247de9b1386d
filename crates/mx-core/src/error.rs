//! Error types for mx-core

use thiserror::Error;

/// Core error type for migratex
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Required configuration value missing
    #[error("[C001] Missing required setting `{name}`")]
    MissingSetting { name: String },

    /// C002: Configuration file not found
    #[error("[C002] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C003: Failed to parse configuration file
    #[error("[C003] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// C004: Invalid configuration value
    #[error("[C004] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C005: Migrations directory could not be listed
    #[error("[C005] Failed reading files in directory {path}: {source}")]
    DirectoryUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// C006: Migration file name has no parseable version prefix
    #[error("[C006] Failed determining {track} migration version from file name '{file}': {reason}")]
    InvalidVersion {
        track: String,
        file: String,
        reason: String,
    },

    /// C007: Two migration files share a version within one track
    #[error("[C007] Duplicate {track} migration version {version}: '{first}' and '{second}'")]
    DuplicateVersion {
        track: String,
        version: i64,
        first: String,
        second: String,
    },

    /// C008: Outstanding migration sits behind the other track's ledger
    #[error(
        "[C008] Found inconsistent migration state. Outstanding {track} migration '{file}' should have already been applied since it comes before the current {other_track} migration version {other_version}. This must be manually fixed"
    )]
    InconsistentState {
        track: String,
        file: String,
        other_track: String,
        other_version: i64,
    },

    /// C009: DML template could not be read
    #[error("[C009] Failed reading DML migration file {path}: {source}")]
    TemplateUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// C010: DML data file could not be read
    #[error("[C010] Failed reading DML migration data file {path}: {source}")]
    DataFileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// C011: DML data file is not a flat string map
    #[error("[C011] Failed parsing DML migration data file {path} as a flat string map: {source}")]
    DataFileInvalid {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
