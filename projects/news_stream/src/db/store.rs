use std::time::Duration;

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use thiserror::Error;
use tracing::info;

use crate::db::{schema::CREATE_NEWS_TABLE, SqlitePool, SqlitePooledConnection};

/// Owns the connection pool for the news database.
///
/// Built once at startup and handed to whatever needs storage. Every caller
/// checks out a connection through [`NewsStore::connection`] and returns it by
/// dropping the guard.
#[derive(Clone)]
pub struct NewsStore {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
pub enum OpenStoreError {
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        source: r2d2::Error,
    },

    #[error("CreateNewsTable: {source}")]
    CreateNewsTable {
        source: diesel::result::Error,
    },
}

impl NewsStore {
    /// Opens (or creates) the SQLite file at `database_url` and makes sure the
    /// `news` table exists.
    ///
    /// Connections are made lazily; a path that cannot be opened fails after
    /// `connect_timeout` on the first checkout.
    pub fn open(
        database_url: &str,
        pool_size: u32,
        connect_timeout: Duration,
    ) -> Result<Self, OpenStoreError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .connection_timeout(connect_timeout)
            .build_unchecked(manager);

        let mut conn = pool
            .get()
            .map_err(|source| OpenStoreError::GetConnectionFromPool { source })?;

        diesel::sql_query(CREATE_NEWS_TABLE)
            .execute(&mut *conn)
            .map_err(|source| OpenStoreError::CreateNewsTable { source })?;

        info!(database_url, pool_size, "news store open");

        drop(conn);
        Ok(Self { pool })
    }

    pub fn connection(&self) -> Result<SqlitePooledConnection, r2d2::Error> {
        self.pool.get()
    }

    /// Drops this handle. The pool's connections close once the last clone
    /// of the store is gone.
    pub fn close(self) {
        let state = self.pool.state();
        info!(connections = state.connections, "closing news store");
    }
}
