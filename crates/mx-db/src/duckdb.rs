//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Row, Statement, Value};
use async_trait::async_trait;
use duckdb::types::{ToSqlOutput, Value as DuckValue};
use duckdb::{params_from_iter, Connection, ToSql};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

type Interrupt = Arc<dyn Fn() + Send + Sync>;

/// DuckDB database backend
///
/// Every call runs on tokio's blocking pool. Dropping an in-flight call
/// (deadline expiry, cancellation) interrupts the running query, so an open
/// transaction rolls back instead of committing in the background.
pub struct DuckDbBackend {
    conn: Arc<Mutex<Connection>>,
    interrupt: Interrupt,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::wrap(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", e, path.display())))?;
        Ok(Self::wrap(conn))
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn wrap(conn: Connection) -> Self {
        let handle = conn.interrupt_handle();
        Self {
            conn: Arc::new(Mutex::new(conn)),
            interrupt: Arc::new(move || handle.interrupt()),
        }
    }

    /// Run `work` against the locked connection on the blocking pool.
    async fn blocking<T, F>(&self, work: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let mut guard = InterruptOnDrop(Some(Arc::clone(&self.interrupt)));

        let joined = tokio::task::spawn_blocking(move || {
            let mut conn = lock(&conn)?;
            work(&mut conn)
        })
        .await;

        guard.disarm();
        joined.map_err(|e| DbError::ExecutionError(format!("database task failed: {}", e)))?
    }
}

/// Interrupts the connection unless disarmed before being dropped.
struct InterruptOnDrop(Option<Interrupt>);

impl InterruptOnDrop {
    fn disarm(&mut self) {
        self.0 = None;
    }
}

impl Drop for InterruptOnDrop {
    fn drop(&mut self) {
        if let Some(interrupt) = self.0.take() {
            log::warn!("Interrupting in-flight DuckDB query");
            interrupt();
        }
    }
}

fn lock(conn: &Mutex<Connection>) -> DbResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| DbError::MutexPoisoned(e.to_string()))
}

fn query_rows(conn: &Connection, statement: &Statement) -> DbResult<Vec<Row>> {
    let mut stmt = conn
        .prepare(&statement.sql)
        .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, statement.sql)))?;

    // Column count is read per row; DuckDB panics on Statement::column_count
    // before execution.
    let rows = stmt
        .query_map(params_from_iter(statement.params.iter()), |row| {
            let column_count = row.as_ref().column_count();
            (0..column_count)
                .map(|i| row.get::<_, DuckValue>(i).map(Value::from))
                .collect::<Result<Row, _>>()
        })
        .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, statement.sql)))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DbError::ExecutionError(format!("row error: {}", e)))?;
    Ok(rows)
}

fn execute_transaction(conn: &mut Connection, statements: &[Statement]) -> DbResult<Vec<usize>> {
    let tx = conn
        .transaction()
        .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {}", e)))?;

    // Dropping `tx` on an early return rolls everything back.
    let mut row_counts = Vec::with_capacity(statements.len());
    for (idx, statement) in statements.iter().enumerate() {
        let count = tx
            .execute(&statement.sql, params_from_iter(statement.params.iter()))
            .map_err(|e| {
                DbError::TransactionError(format!(
                    "statement {} of {} failed ({}): {}",
                    idx + 1,
                    statements.len(),
                    statement,
                    e
                ))
            })?;
        row_counts.push(count);
    }

    tx.commit()
        .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {}", e)))?;
    Ok(row_counts)
}

/// All statements or none.
fn execute_ddl(conn: &mut Connection, statements: &[String]) -> DbResult<()> {
    let tx = conn
        .transaction()
        .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {}", e)))?;
    for sql in statements {
        tx.execute_batch(sql).map_err(DbError::from)?;
    }
    tx.commit().map_err(DbError::from)
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn query(&self, statement: &Statement) -> DbResult<Vec<Row>> {
        let statement = statement.clone();
        self.blocking(move |conn| query_rows(conn, &statement))
            .await
    }

    async fn run_transaction(&self, statements: &[Statement]) -> DbResult<Vec<usize>> {
        let statements = statements.to_vec();
        self.blocking(move |conn| execute_transaction(conn, &statements))
            .await
    }

    async fn update_ddl(&self, statements: &[String]) -> DbResult<()> {
        let statements = statements.to_vec();
        self.blocking(move |conn| execute_ddl(conn, &statements))
            .await
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

impl From<DuckValue> for Value {
    fn from(value: DuckValue) -> Self {
        match value {
            DuckValue::Null => Value::Null,
            DuckValue::Boolean(b) => Value::Bool(b),
            DuckValue::TinyInt(i) => Value::Int64(i.into()),
            DuckValue::SmallInt(i) => Value::Int64(i.into()),
            DuckValue::Int(i) => Value::Int64(i.into()),
            DuckValue::BigInt(i) => Value::Int64(i),
            DuckValue::UTinyInt(i) => Value::Int64(i.into()),
            DuckValue::USmallInt(i) => Value::Int64(i.into()),
            DuckValue::UInt(i) => Value::Int64(i.into()),
            DuckValue::Text(s) => Value::Text(s),
            other => Value::Text(format!("{:?}", other)),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        let value = match self {
            Value::Null => DuckValue::Null,
            Value::Bool(b) => DuckValue::Boolean(*b),
            Value::Int64(i) => DuckValue::BigInt(*i),
            Value::Text(s) => DuckValue::Text(s.clone()),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
