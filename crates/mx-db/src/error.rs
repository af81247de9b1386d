//! Error types for mx-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Object already exists (D003)
    #[error("[D003] Object already exists: {0}")]
    AlreadyExists(String),

    /// Transaction aborted or failed to commit (D004)
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Row did not have the expected shape (D006)
    #[error("[D006] Unexpected row in {table}: {message}")]
    UnexpectedRow { table: String, message: String },
}

impl DbError {
    /// True for "object already exists" failures, which callers creating
    /// tables treat as success.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, DbError::AlreadyExists(_))
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants for catalog
        // conflicts, so the message is the only thing to classify on.
        let msg = err.to_string();
        if msg.contains("already exists") {
            DbError::AlreadyExists(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
