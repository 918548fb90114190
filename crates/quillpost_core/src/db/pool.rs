//! Pooled SQLite connections for concurrent callers.
//!
//! # Invariants
//! - Every pooled connection runs the same pragmas as `open_db`.
//! - Migrations run once, on the first checkout, before the pool is
//!   handed out.

use super::migrations::apply_migrations;
use super::open::configure_connection;
use super::DbResult;
use log::info;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use std::time::Instant;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;
pub type PooledConn = r2d2::PooledConnection<SqliteConnectionManager>;

pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Opens a pool of up to `max_size` connections to a database file.
pub fn open_pool(path: impl AsRef<Path>, max_size: u32) -> DbResult<DbPool> {
    let manager = SqliteConnectionManager::file(path).with_init(configure_connection);
    let pool = r2d2::Pool::builder()
        .max_size(max_size.max(1))
        .build(manager)?;
    migrate_once(&pool, "file")?;
    Ok(pool)
}

/// Opens a single-connection in-memory pool.
///
/// Every in-memory SQLite connection is a separate database, so the pool
/// keeps exactly one connection alive for its whole lifetime.
pub fn open_pool_in_memory() -> DbResult<DbPool> {
    let manager = SqliteConnectionManager::memory().with_init(configure_connection);
    let pool = r2d2::Pool::builder()
        .max_size(1)
        .min_idle(Some(1))
        .idle_timeout(None)
        .max_lifetime(None)
        .build(manager)?;
    migrate_once(&pool, "memory")?;
    Ok(pool)
}

fn migrate_once(pool: &DbPool, mode: &'static str) -> DbResult<()> {
    let started_at = Instant::now();
    let mut conn = pool.get()?;
    apply_migrations(&mut conn)?;
    info!(
        "event=db_pool_open module=db status=ok mode={} max_size={} duration_ms={}",
        mode,
        pool.max_size(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}
