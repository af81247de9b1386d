//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// migratex - Apply schema and data migrations in strict version order
#[derive(Parser, Debug)]
#[command(name = "migratex")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a migratex.yml config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Environment identifier selecting `.<env>.dml.sql` migrations
    #[arg(short, long, global = true, env = "MIGRATEX_ENV_ID")]
    pub env_id: Option<String>,

    /// DuckDB database file (or `:memory:`)
    #[arg(long, global = true, env = "MIGRATEX_DATABASE")]
    pub database: Option<String>,

    /// Directory containing the migration files
    #[arg(short = 'd', long, global = true)]
    pub migrations_dir: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all outstanding migrations
    Up(UpArgs),

    /// Show ledger state and the outstanding plan without applying anything
    Status(StatusArgs),
}

/// Arguments for the up command
#[derive(Args, Debug, Default)]
pub struct UpArgs {
    /// Abort the run after this many minutes
    #[arg(long)]
    pub timeout_minutes: Option<u64>,

    /// Schema migration executable
    #[arg(long)]
    pub schema_tool: Option<String>,

    /// Database URL passed to the schema migration executable
    #[arg(long)]
    pub schema_tool_database_url: Option<String>,
}

/// Arguments for the status command
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Also list migrations that are already applied
    #[arg(short, long)]
    pub all: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
