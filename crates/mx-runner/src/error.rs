//! Error types for mx-runner

use mx_core::CoreError;
use mx_db::DbError;
use thiserror::Error;

/// Migration run errors. Every variant is fatal for the current run.
#[derive(Error, Debug)]
pub enum RunError {
    /// Configuration, naming, or ordering problem found before touching the database
    #[error(transparent)]
    Core(#[from] CoreError),

    /// R001: Database operation failed
    #[error("[R001] {context}: {source}")]
    Database {
        context: String,
        #[source]
        source: DbError,
    },

    /// R002: A ledger records an unfinished migration
    #[error("[R002] {table} table is dirty at version {version}, this must be manually fixed before more migrations can be applied")]
    DirtyLedger { table: String, version: i64 },

    /// R003: External DDL tool could not be started
    #[error("[R003] Failed to start schema migration tool '{program}': {source}")]
    ToolSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// R004: External DDL tool exited unsuccessfully
    #[error("[R004] Failed applying {step} ({status}) Stdout={stdout:?}, Stderr={stderr:?}")]
    ToolFailed {
        step: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    /// R005: DML transaction failed after the dirty checkpoint
    #[error("[R005] Failed applying DML migration '{file}' from version {from} to version {to}; DataMigrations is left dirty at version {to}: {source}")]
    DmlFailed {
        file: String,
        from: i64,
        to: i64,
        #[source]
        source: DbError,
    },

    /// R006: Run interrupted by a termination signal
    #[error("[R006] Migration run cancelled while {step}")]
    Cancelled { step: String },

    /// R007: Run exceeded its deadline
    #[error("[R007] Migration run exceeded its timeout of {minutes} minute(s)")]
    TimedOut { minutes: u64 },
}

impl RunError {
    /// Wrap a database error with a description of the failing step.
    pub fn database(context: impl Into<String>) -> impl FnOnce(DbError) -> RunError {
        let context = context.into();
        move |source| RunError::Database { context, source }
    }
}

/// Result type alias for RunError
pub type RunResult<T> = Result<T, RunError>;
