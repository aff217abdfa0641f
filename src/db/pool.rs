use std::str::FromStr;

use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{MySql, MySqlConnection, MySqlPool};
use tracing::{debug, info, instrument};

use crate::config::Config;
use crate::db::DbError;

/// Pooled connection factory for the tenants database.
///
/// The pool is created lazily: building a `Database` never touches the
/// network, the first `acquire` does. Connections are pinged before reuse.
#[derive(Clone)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    pub fn new(config: &Config) -> Result<Self, DbError> {
        let options = MySqlConnectOptions::from_str(&config.database_url()?)?;
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .test_before_acquire(true)
            .connect_lazy_with(options);

        Ok(Self { pool })
    }

    /// Open a session. Callers must `close` it on every exit path.
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Result<Session, DbError> {
        debug!("Acquiring database session");
        let conn = self.pool.acquire().await?;
        info!("Database connection established");
        Ok(Session { conn })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Connection pool closed");
    }
}

/// One exclusively owned database connection.
///
/// Dropping a session hands the connection back to the pool; `close`
/// terminates it instead.
pub struct Session {
    conn: PoolConnection<MySql>,
}

impl Session {
    pub fn connection(&mut self) -> &mut MySqlConnection {
        &mut self.conn
    }

    pub async fn close(self) -> Result<(), DbError> {
        self.conn.close().await?;
        debug!("Database session closed");
        Ok(())
    }
}
