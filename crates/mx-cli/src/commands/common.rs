//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use mx_core::Config;
use mx_db::{Database, DbResult, DuckDbBackend};
use std::path::Path;
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Config file picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "migratex.yml";

/// Build the run configuration from the config file and global flags.
///
/// An explicit `--config` must exist; the default file is optional. The
/// result is not validated so commands can apply their own overrides first.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let mut config = match &global.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                Config::load(default)
                    .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_FILE))?
            } else {
                Config::default()
            }
        }
    };

    apply_global_overrides(&mut config, global);
    Ok(config)
}

/// Flags and environment variables win over the config file.
pub(crate) fn apply_global_overrides(config: &mut Config, global: &GlobalArgs) {
    if let Some(env_id) = &global.env_id {
        config.env_id = env_id.clone();
    }
    if let Some(database) = &global.database {
        config.database.path = database.clone();
    }
    if let Some(dir) = &global.migrations_dir {
        config.migrations_dir = dir.clone();
    }
}

/// Validate the final configuration and log it.
pub(crate) fn finish_config(config: Config) -> Result<Config> {
    config.validate().context("Invalid configuration")?;
    log::debug!("Resolved configuration: {:?}", config);
    Ok(config)
}

/// Opens a fresh DuckDB connection to the configured database on each call.
pub(crate) fn connector(config: &Config) -> impl Fn() -> DbResult<Arc<dyn Database>> {
    let path = config.database.path.clone();
    move || {
        let db: Arc<dyn Database> = Arc::new(DuckDbBackend::new(&path)?);
        Ok(db)
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
