//! mx-runner - Migration engine for migratex
//!
//! Drives a migration run end to end: discovery, ledger checks, outstanding
//! set resolution, and strictly ordered application of DDL (through the
//! external tool) and DML (through a transactional applier).

pub mod context;
pub mod dml;
pub mod error;
pub mod orchestrator;
pub mod schema_tool;

pub use context::RunContext;
pub use dml::apply_dml_migration;
pub use error::{RunError, RunResult};
pub use orchestrator::{read_status, Orchestrator, RunOutcome, Status};
pub use schema_tool::{MigrateCli, SchemaMigrator};
