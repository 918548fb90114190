//! Shared application state and blocking store access.

use crate::config::IN_MEMORY_DATABASE;
use crate::error::AppError;
use quillpost_core::db::{open_pool, open_pool_in_memory, DbError, DbPool};
use rusqlite::Connection;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pool: DbPool,
}

impl AppState {
    /// Wraps an already migrated pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Opens (and migrates) the configured store. `:memory:` gets a
    /// single-connection pool.
    pub fn open(database_path: &str, pool_size: u32) -> Result<Self, DbError> {
        let pool = if database_path == IN_MEMORY_DATABASE {
            open_pool_in_memory()?
        } else {
            open_pool(database_path, pool_size)?
        };
        Ok(Self::new(pool))
    }

    /// Runs `op` on a pooled connection on the blocking thread pool.
    ///
    /// Each call checks out its own connection; SQLite transactions inside
    /// `op` are the only serialization between concurrent calls.
    pub async fn with_conn<T, E, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&Connection) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: Into<AppError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get().map_err(DbError::from)?;
            op(&*conn).map_err(Into::into)
        })
        .await
        .map_err(|err| AppError::Internal(format!("blocking store task failed: {err}")))?
    }
}
