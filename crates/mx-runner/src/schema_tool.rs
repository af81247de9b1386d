//! External DDL migration tool
//!
//! Schema changes are applied by a separate `migrate` executable that keeps
//! its own ledger in `SchemaMigrations`. migratex only decides when to run it
//! and how many steps to take.

use crate::error::{RunError, RunResult};
use async_trait::async_trait;
use mx_core::Config;
use std::path::PathBuf;
use std::process::Stdio;
use tokio_util::sync::CancellationToken;

/// Applies pending schema migrations.
#[async_trait]
pub trait SchemaMigrator: Send + Sync {
    /// Apply `steps` pending DDL migrations, or all of them when `None`.
    async fn up(&self, steps: Option<u32>, cancel: &CancellationToken) -> RunResult<()>;
}

/// Runs `<bin> -path <dir> -database <url> up [N]` as a subprocess.
#[derive(Debug, Clone)]
pub struct MigrateCli {
    program: String,
    migrations_dir: PathBuf,
    database_url: String,
}

impl MigrateCli {
    pub fn new(
        program: impl Into<String>,
        migrations_dir: impl Into<PathBuf>,
        database_url: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            migrations_dir: migrations_dir.into(),
            database_url: database_url.into(),
        }
    }

    /// Build from the run configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.schema_tool.bin.clone(),
            config.migrations_dir.clone(),
            config.schema_tool_database_url(),
        )
    }

    /// Command line arguments for one invocation.
    pub fn args(&self, steps: Option<u32>) -> Vec<String> {
        let mut args = vec![
            "-path".to_string(),
            self.migrations_dir.display().to_string(),
            "-database".to_string(),
            self.database_url.clone(),
            "up".to_string(),
        ];
        if let Some(n) = steps {
            args.push(n.to_string());
        }
        args
    }
}

fn describe(steps: Option<u32>) -> String {
    match steps {
        None => "all DDL migrations".to_string(),
        Some(1) => "next DDL migration".to_string(),
        Some(n) => format!("next {} DDL migrations", n),
    }
}

#[async_trait]
impl SchemaMigrator for MigrateCli {
    async fn up(&self, steps: Option<u32>, cancel: &CancellationToken) -> RunResult<()> {
        let step = describe(steps);
        let args = self.args(steps);
        log::info!("Applying {}: {} {}", step, self.program, args.join(" "));

        let child = tokio::process::Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = tokio::select! {
            output = child => output.map_err(|source| RunError::ToolSpawn {
                program: self.program.clone(),
                source,
            })?,
            _ = cancel.cancelled() => {
                return Err(RunError::Cancelled { step: format!("applying {}", step) });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(RunError::ToolFailed {
                step,
                status: output.status.to_string(),
                stdout,
                stderr,
            });
        }

        log::info!(
            "Finished applying {} Stdout={:?}, Stderr={:?}",
            step,
            stdout,
            stderr
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "schema_tool_test.rs"]
mod tests;
