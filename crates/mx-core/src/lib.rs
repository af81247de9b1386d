//! mx-core - Core library for migratex
//!
//! This crate provides the pieces of the migration engine that never touch a
//! database: configuration, discovery of migration files, version parsing,
//! outstanding-set resolution, and DML template rendering.

pub mod config;
pub mod discovery;
pub mod error;
pub mod migration;
pub mod plan;
pub mod template;
pub mod track;

pub use config::Config;
pub use discovery::{classify, discover, Discovered};
pub use error::{CoreError, CoreResult};
pub use migration::{parse_version, MigrationFile};
pub use plan::{resolve_outstanding, Outstanding};
pub use track::Track;
