//! `DuckDB` connection pooling.
//!
//! The database file is opened exactly once. Every pooled connection is a
//! clone of that root handle, so all of them share one database instance and
//! see each other's committed transactions.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ::duckdb::Connection;
use tracing::warn;

use crate::WarehouseError;

struct PoolInner {
    db_path: PathBuf,
    max_idle: usize,
    root: Mutex<Connection>,
    idle: Mutex<Vec<Connection>>,
}

/// Hands out connections to a single `DuckDB` database file.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Open the database at `path` and build a pool keeping at most
    /// `max_idle` spare connections around.
    ///
    /// # Errors
    /// Returns an error if the database file cannot be opened or configured.
    pub fn open(path: impl Into<PathBuf>, max_idle: usize) -> Result<Self, WarehouseError> {
        let db_path = path.into();
        let root = Connection::open(db_path.as_path())?;
        configure_connection(&root)?;

        Ok(Self {
            inner: Arc::new(PoolInner {
                db_path,
                max_idle: max_idle.max(1),
                root: Mutex::new(root),
                idle: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Take an idle connection, or clone a fresh one from the root handle.
    ///
    /// # Errors
    /// Returns an error if a pool lock is poisoned or cloning the root
    /// connection fails.
    pub fn acquire(&self) -> Result<PooledConnection, WarehouseError> {
        let reused = self
            .inner
            .idle
            .lock()
            .map_err(|_| WarehouseError::PoolPoisoned)?
            .pop();

        let connection = match reused {
            Some(connection) => connection,
            None => {
                let root = self
                    .inner
                    .root
                    .lock()
                    .map_err(|_| WarehouseError::PoolPoisoned)?;
                let connection = root.try_clone()?;
                configure_connection(&connection)?;
                connection
            }
        };

        Ok(PooledConnection {
            pool: Arc::clone(&self.inner),
            connection: Some(connection),
        })
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        self.inner.db_path.as_path()
    }
}

/// A connection that goes back to the idle list when dropped.
pub struct PooledConnection {
    pool: Arc<PoolInner>,
    connection: Option<Connection>,
}

impl PooledConnection {
    /// Run `work` inside `BEGIN`/`COMMIT`. Any error rolls the whole
    /// transaction back, so callers never leave half-written state behind.
    ///
    /// # Errors
    /// Returns the error produced by `work`, or the error raised while
    /// beginning or committing the transaction.
    pub fn in_transaction<T>(
        &self,
        work: impl FnOnce(&Connection) -> Result<T, WarehouseError>,
    ) -> Result<T, WarehouseError> {
        self.execute_batch("BEGIN TRANSACTION")?;

        let result = work(&**self).and_then(|value| {
            self.execute_batch("COMMIT")?;
            Ok(value)
        });

        if result.is_err() {
            if let Err(rollback_error) = self.execute_batch("ROLLBACK") {
                warn!(error = %rollback_error, "rollback after failed transaction did not complete");
            }
        }

        result
    }
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        self.connection
            .as_ref()
            .expect("pooled connection unexpectedly missing")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };

        if let Ok(mut idle) = self.pool.idle.lock() {
            if idle.len() < self.pool.max_idle {
                idle.push(connection);
            }
        }
    }
}

fn configure_connection(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch("PRAGMA disable_progress_bar;")
}
