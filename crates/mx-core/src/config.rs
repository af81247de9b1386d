//! Configuration types and parsing for migratex.yml

use crate::error::{CoreError, CoreResult};
use crate::track::Track;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Run configuration, built once at startup and passed by reference.
///
/// Values come from an optional YAML file and are then overridden by
/// command line flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Environment identifier used to select `.<env>.dml.sql` migrations
    #[serde(default)]
    pub env_id: String,

    /// Directory containing the migration files
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,

    /// Target database
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Overall deadline for a run, in minutes
    #[serde(default = "default_timeout_minutes")]
    pub timeout_minutes: u64,

    /// External schema migration tool
    #[serde(default)]
    pub schema_tool: SchemaToolConfig,
}

/// Target database coordinates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB database file path (or `:memory:`)
    #[serde(default)]
    pub path: String,
}

/// How to invoke the external DDL migration executable
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaToolConfig {
    /// Executable name or path
    #[serde(default = "default_schema_tool_bin")]
    pub bin: String,

    /// Connection URL passed as `-database`; derived from `database.path`
    /// when unset. Must select the `SchemaMigrations` ledger table.
    #[serde(default)]
    pub database_url: Option<String>,
}

impl Default for SchemaToolConfig {
    fn default() -> Self {
        Self {
            bin: default_schema_tool_bin(),
            database_url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            env_id: String::new(),
            migrations_dir: default_migrations_dir(),
            database: DatabaseConfig::default(),
            timeout_minutes: default_timeout_minutes(),
            schema_tool: SchemaToolConfig::default(),
        }
    }
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_timeout_minutes() -> u64 {
    60
}

fn default_schema_tool_bin() -> String {
    "migrate".to_string()
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Check that every required setting is present.
    pub fn validate(&self) -> CoreResult<()> {
        if self.env_id.trim().is_empty() {
            return Err(CoreError::MissingSetting {
                name: "env_id".to_string(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(CoreError::MissingSetting {
                name: "database.path".to_string(),
            });
        }
        if self.timeout_minutes == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "timeout_minutes must be greater than zero".to_string(),
            });
        }
        if self.schema_tool.bin.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "schema_tool.bin must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Deadline for the whole run.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_minutes.saturating_mul(60))
    }

    /// Connection URL handed to the external DDL tool.
    ///
    /// The derived default points the tool at the `SchemaMigrations` ledger;
    /// left to itself the tool would record versions in `schema_migrations`.
    pub fn schema_tool_database_url(&self) -> String {
        self.schema_tool.database_url.clone().unwrap_or_else(|| {
            format!(
                "duckdb://{}?x-migrations-table={}",
                self.database.path,
                Track::Schema.table_name()
            )
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
