//! Top-level migration control flow
//!
//! ```text
//! Discover ─┬─ nothing found ─────────────────────────────► NoMigrations
//!           ├─ DDL only ─────────────► tool `up` ──────────► DdlOnly
//!           └─ DDL + DML ─► ledgers ─┬─ dirty ─────────────► error
//!                                    ├─ nothing outstanding ► NothingOutstanding
//!                                    ├─ DDL outstanding only ► DdlOnly
//!                                    └─ merged, one step at a time ► Interleaved
//! ```

use crate::context::RunContext;
use crate::dml::apply_dml_migration;
use crate::error::{RunError, RunResult};
use crate::schema_tool::SchemaMigrator;
use mx_core::{discover, resolve_outstanding, Config, Discovered, Outstanding, Track};
use mx_db::{ledger, Database, DbResult, LedgerState};
use std::fmt;
use std::sync::Arc;

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No migration files for this environment
    NoMigrations,
    /// Every discovered migration is already applied
    NothingOutstanding,
    /// All pending DDL handed to the external tool in one invocation
    DdlOnly,
    /// Outstanding DDL and DML applied one by one in version order
    Interleaved {
        ddl_steps: usize,
        dml_applied: usize,
        dml_version: i64,
    },
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::NoMigrations => write!(f, "no migrations found"),
            RunOutcome::NothingOutstanding => write!(f, "no outstanding migrations"),
            RunOutcome::DdlOnly => write!(f, "applied all DDL migrations"),
            RunOutcome::Interleaved {
                ddl_steps,
                dml_applied,
                dml_version,
            } => write!(
                f,
                "applied {} DDL and {} DML migrations, DML version is now {}",
                ddl_steps, dml_applied, dml_version
            ),
        }
    }
}

/// Snapshot of discovered files, ledgers, and the pending plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub discovered: Discovered,
    pub schema: LedgerState,
    pub data: LedgerState,
    /// `None` when a dirty ledger makes planning meaningless
    pub outstanding: Option<Outstanding>,
}

/// Inspect ledgers and compute the plan without applying anything.
///
/// Ledger tables are never created here; a missing table reads as version 0.
/// Dirty ledgers are reported in the result instead of failing.
pub async fn read_status<C>(config: &Config, connect: C) -> RunResult<Status>
where
    C: Fn() -> DbResult<Arc<dyn Database>>,
{
    let discovered = discover(&config.migrations_dir, &config.env_id)?;
    let db = open(config, &connect)?;

    let schema = peek_ledger(db.as_ref(), Track::Schema).await?;
    let data = peek_ledger(db.as_ref(), Track::Data).await?;

    let outstanding = if schema.dirty || data.dirty {
        None
    } else {
        Some(resolve_outstanding(
            &discovered.ddl,
            &discovered.dml,
            schema.version,
            data.version,
        )?)
    };

    Ok(Status {
        discovered,
        schema,
        data,
        outstanding,
    })
}

/// Drives one migration run against one database.
///
/// The database connection is closed whenever the external schema tool runs,
/// since DuckDB lets only one process hold a database file open for writing.
pub struct Orchestrator<'a> {
    config: &'a Config,
    schema_tool: &'a dyn SchemaMigrator,
    ctx: &'a RunContext,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a Config, schema_tool: &'a dyn SchemaMigrator, ctx: &'a RunContext) -> Self {
        Self {
            config,
            schema_tool,
            ctx,
        }
    }

    /// Run every outstanding migration.
    ///
    /// `connect` is only called when DML migrations exist; DDL-only
    /// directories are handed straight to the external tool. It may be
    /// called again after each DDL step to reopen the database.
    pub async fn run<C>(&self, connect: C) -> RunResult<RunOutcome>
    where
        C: Fn() -> DbResult<Arc<dyn Database>>,
    {
        log::info!("Beginning migration");
        self.ctx.checkpoint("discovering migrations")?;

        let discovered = discover(&self.config.migrations_dir, &self.config.env_id)?;

        if discovered.is_empty() {
            log::info!("No migrations found");
            return Ok(RunOutcome::NoMigrations);
        }

        if discovered.dml.is_empty() {
            log::info!("No DML migrations found, will apply all DDL migrations...");
            self.apply_all_ddl().await?;
            return Ok(RunOutcome::DdlOnly);
        }

        log::info!("DDL and DML migrations found, will determine if any are outstanding...");
        self.ctx.checkpoint("connecting to the database")?;
        let db = open(self.config, &connect)?;

        let schema = load_clean_ledger(db.as_ref(), Track::Schema).await?;
        let data = load_clean_ledger(db.as_ref(), Track::Data).await?;

        let outstanding =
            resolve_outstanding(&discovered.ddl, &discovered.dml, schema.version, data.version)?;

        if outstanding.is_empty() {
            log::info!("No outstanding migrations found");
            return Ok(RunOutcome::NothingOutstanding);
        }

        if outstanding.dml.is_empty() {
            log::info!("No outstanding DML migrations found, will apply all DDL migrations...");
            close(db);
            self.apply_all_ddl().await?;
            return Ok(RunOutcome::DdlOnly);
        }

        log::info!("Outstanding DDL and DML migrations found, will apply all interleaved...");
        let outcome = self
            .apply_interleaved(&connect, db, &outstanding, data.version)
            .await?;
        log::info!("Finished migration");
        Ok(outcome)
    }

    async fn apply_all_ddl(&self) -> RunResult<()> {
        self.ctx.checkpoint("applying all DDL migrations")?;
        self.schema_tool.up(None, self.ctx.token()).await
    }

    async fn apply_interleaved<C>(
        &self,
        connect: &C,
        db: Arc<dyn Database>,
        outstanding: &Outstanding,
        mut dml_version: i64,
    ) -> RunResult<RunOutcome>
    where
        C: Fn() -> DbResult<Arc<dyn Database>>,
    {
        let order = outstanding.execution_order();
        log::info!(
            "Applying {} outstanding migrations: {:?}",
            order.len(),
            order.iter().map(|m| m.name.as_str()).collect::<Vec<_>>()
        );

        let mut db = Some(db);
        let mut ddl_steps = 0;
        let mut dml_applied = 0;
        for migration in &order {
            self.ctx
                .checkpoint(&format!("applying '{}'", migration.name))?;
            log::debug!(
                "Applying outstanding migration '{}' where current DML migration version is {}",
                migration.name,
                dml_version
            );

            match migration.track {
                Track::Schema => {
                    if let Some(conn) = db.take() {
                        close(conn);
                    }
                    self.schema_tool.up(Some(1), self.ctx.token()).await?;
                    ddl_steps += 1;
                }
                Track::Data => {
                    let conn = match db.take() {
                        Some(conn) => conn,
                        None => open(self.config, connect)?,
                    };
                    dml_version = apply_dml_migration(
                        conn.as_ref(),
                        &self.config.migrations_dir,
                        dml_version,
                        &migration.name,
                    )
                    .await?;
                    db = Some(conn);
                    dml_applied += 1;
                }
            }
        }

        Ok(RunOutcome::Interleaved {
            ddl_steps,
            dml_applied,
            dml_version,
        })
    }
}

fn open<C>(config: &Config, connect: &C) -> RunResult<Arc<dyn Database>>
where
    C: Fn() -> DbResult<Arc<dyn Database>>,
{
    log::debug!("Connecting to database '{}'", config.database.path);
    let db = connect().map_err(RunError::database(format!(
        "Failed connecting to database '{}'",
        config.database.path
    )))?;
    log::debug!("Connected to {} database", db.db_type());
    Ok(db)
}

fn close(db: Arc<dyn Database>) {
    log::debug!("Closing {} database connection for the schema tool", db.db_type());
    drop(db);
}

async fn peek_ledger(db: &dyn Database, track: Track) -> RunResult<LedgerState> {
    ledger::read_if_exists(db, track)
        .await
        .map_err(RunError::database(format!(
            "Failed reading last migration in table '{}'",
            track.table_name()
        )))
}

async fn load_ledger(db: &dyn Database, track: Track) -> RunResult<LedgerState> {
    log::info!("Determining last {} migration...", track);
    ledger::load(db, track)
        .await
        .map_err(RunError::database(format!(
            "Failed determining last migration in table '{}'",
            track.table_name()
        )))
}

async fn load_clean_ledger(db: &dyn Database, track: Track) -> RunResult<LedgerState> {
    let state = load_ledger(db, track).await?;
    if state.dirty {
        return Err(RunError::DirtyLedger {
            table: track.table_name().to_string(),
            version: state.version,
        });
    }
    Ok(state)
}
