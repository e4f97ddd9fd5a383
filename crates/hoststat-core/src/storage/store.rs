//! The series table and the single-row totals table behind a connection pool.

use chrono::Utc;
use sqlx::any::{AnyPoolOptions, install_default_drivers};
use sqlx::{Any, Pool};
use tracing::debug;

use crate::sample::{GraphRow, StatRow};
use crate::storage::schema::{
    CLEAR_STAT, COUNT_GRAPH, COUNT_STAT, CREATE_GRAPH_TABLE, CREATE_STAT_TABLE, INSERT_GRAPH,
    SEED_STAT, UPDATE_STAT,
};

/// Error type for store operations.
#[derive(Debug)]
pub enum StoreError {
    /// The pool could not be built from the database URL.
    Connect(sqlx::Error),
    /// A statement of the named operation failed.
    Query {
        operation: &'static str,
        source: sqlx::Error,
    },
}

impl StoreError {
    fn query(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| StoreError::Query { operation, source }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Connect(e) => write!(f, "database connection: {}", e),
            StoreError::Query { operation, source } => {
                write!(f, "{} failed: {}", operation, source)
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Connect(e) => Some(e),
            StoreError::Query { source, .. } => Some(source),
        }
    }
}

/// Milliseconds since the Unix epoch, as stored in the `time` columns.
fn now_millis() -> f64 {
    Utc::now().timestamp_millis() as f64
}

/// Persistence for sampled rows.
///
/// Every operation borrows a pooled connection for its own statements only,
/// and the connection goes back to the pool when the operation returns,
/// whether it succeeded or not. All operations are safe to run concurrently:
/// series writes are independent inserts and the totals write is an
/// unconditional overwrite of the single row.
#[derive(Clone)]
pub struct Store {
    pool: Pool<Any>,
}

impl Store {
    /// Builds a pool for `url` without connecting yet.
    ///
    /// Connection problems surface from the first operation, normally
    /// [`Store::initialize`].
    pub fn connect_lazy(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(url)
            .map_err(StoreError::Connect)?;
        Ok(Self { pool })
    }

    /// Creates both tables if missing and resets the totals table to a single
    /// all-NULL row.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(StoreError::query("initialize"))?;

        sqlx::query(CREATE_GRAPH_TABLE)
            .execute(&mut *conn)
            .await
            .map_err(StoreError::query("create graph table"))?;
        sqlx::query(CREATE_STAT_TABLE)
            .execute(&mut *conn)
            .await
            .map_err(StoreError::query("create stat table"))?;

        let mut tx = sqlx::Connection::begin(&mut *conn)
            .await
            .map_err(StoreError::query("initialize"))?;
        sqlx::query(CLEAR_STAT)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::query("clear stat table"))?;
        sqlx::query(SEED_STAT)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::query("seed stat table"))?;
        tx.commit()
            .await
            .map_err(StoreError::query("seed stat table"))?;

        debug!("stat table reset to placeholder row");
        Ok(())
    }

    /// Appends one row to the series table, stamped with the current time.
    pub async fn append_sample(&self, row: &GraphRow) -> Result<(), StoreError> {
        sqlx::query(INSERT_GRAPH)
            .bind(now_millis())
            .bind(row.cpu_load)
            .bind(row.cpu_process_count)
            .bind(row.ram_used)
            .bind(row.ram_used_percentage)
            .bind(row.swap_used)
            .bind(row.swap_used_percentage)
            .bind(row.disk_read_speed)
            .bind(row.disk_write_speed)
            .bind(row.download_speed)
            .bind(row.upload_speed)
            .bind(row.ping_google)
            .bind(row.ping_cloudflare)
            .bind(row.ping_discord)
            .execute(&self.pool)
            .await
            .map_err(StoreError::query("append sample"))?;
        Ok(())
    }

    /// Overwrites every column of the single totals row, stamped with the current time.
    pub async fn replace_snapshot(&self, row: &StatRow) -> Result<(), StoreError> {
        sqlx::query(UPDATE_STAT)
            .bind(now_millis())
            .bind(row.cpu_clock)
            .bind(row.cpu_cores)
            .bind(row.uptime)
            .bind(row.ram_total)
            .bind(row.swap_total)
            .bind(row.disk_size)
            .bind(row.disk_read_total)
            .bind(row.disk_write_total)
            .bind(row.disk_used)
            .bind(row.disk_used_percentage)
            .bind(row.download_total)
            .bind(row.upload_total)
            .execute(&self.pool)
            .await
            .map_err(StoreError::query("replace snapshot"))?;
        Ok(())
    }

    /// Number of rows in the series table.
    pub async fn series_len(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar(COUNT_GRAPH)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::query("count graph rows"))
    }

    /// Number of rows in the totals table. One once initialized.
    pub async fn totals_len(&self) -> Result<i64, StoreError> {
        sqlx::query_scalar(COUNT_STAT)
            .fetch_one(&self.pool)
            .await
            .map_err(StoreError::query("count stat rows"))
    }

    #[cfg(test)]
    pub(crate) async fn count_where(&self, table: &str, condition: &str) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE {}", table, condition);
        sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    #[cfg(test)]
    pub(crate) async fn drop_series_table(&self) {
        sqlx::query("DROP TABLE graph")
            .execute(&self.pool)
            .await
            .unwrap();
    }
}
