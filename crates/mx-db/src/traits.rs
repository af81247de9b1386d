//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use std::fmt;

/// A single column value read from, or bound into, a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Int64(i64),
    Text(String),
}

/// One result row.
pub type Row = Vec<Value>;

/// SQL text plus positional `?` parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    /// A statement without parameters
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// A statement with positional parameters
    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.sql)
        } else {
            write!(f, "{} {:?}", self.sql, self.params)
        }
    }
}

/// Database abstraction used by the migration engine
///
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run a read-only query and return every row
    async fn query(&self, statement: &Statement) -> DbResult<Vec<Row>>;

    /// Execute all statements in one read-write transaction.
    ///
    /// Either every statement commits or none does. Returns the affected row
    /// count of each statement.
    async fn run_transaction(&self, statements: &[Statement]) -> DbResult<Vec<usize>>;

    /// Apply schema statements and wait for them to complete.
    ///
    /// A conflict with an existing object is reported as
    /// [`DbError::AlreadyExists`](crate::DbError::AlreadyExists).
    async fn update_ddl(&self, statements: &[String]) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
