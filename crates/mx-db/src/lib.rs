//! mx-db - Database abstraction layer for migratex
//!
//! This crate provides the `Database` trait the migration engine talks to,
//! a DuckDB implementation of it, and the ledger tables that record which
//! schema and data migrations have been applied.

pub mod duckdb;
pub mod error;
pub mod ledger;
pub mod traits;

pub use crate::duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use ledger::LedgerState;
pub use traits::{Database, Row, Statement, Value};
