//! Per-operation SQLite connections.
//!
//! There is no pool: every repository call opens its own connection and
//! closes it before returning.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use tracing::{debug, error, warn};

use crate::config::StoreConfig;
use crate::db::{DbError, DbResult};

/// Source of live connections to the store.
///
/// The returned connection is owned by the caller, who must close it on
/// every exit path. Dropping it also closes it.
pub trait ConnectionProvider: Send + Sync {
    async fn acquire(&self) -> DbResult<SqliteConnection>;
}

/// Opens a fresh SQLite connection for every `acquire` call.
pub struct SqliteProvider {
    config: StoreConfig,
    options: SqliteConnectOptions,
}

impl SqliteProvider {
    pub fn new(config: StoreConfig) -> Self {
        if config.host.is_some() || config.user.is_some() || config.password.is_some() {
            warn!(
                database = %config.database.display(),
                "host/user/password are set but the embedded store has no endpoint or credentials; ignoring them"
            );
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.database)
            .create_if_missing(config.create_if_missing)
            .foreign_keys(config.foreign_keys)
            .busy_timeout(config.connect_timeout);

        Self { config, options }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl ConnectionProvider for SqliteProvider {
    async fn acquire(&self) -> DbResult<SqliteConnection> {
        debug!(database = %self.config.database.display(), "opening connection");
        connect_within(
            self.config.connect_timeout,
            &self.config.database,
            self.options.connect(),
        )
        .await
    }
}

/// Await `connect`, giving up after `timeout`.
pub(crate) async fn connect_within<F>(
    timeout: Duration,
    database: &Path,
    connect: F,
) -> DbResult<SqliteConnection>
where
    F: Future<Output = Result<SqliteConnection, sqlx::Error>>,
{
    match tokio::time::timeout(timeout, connect).await {
        Ok(Ok(conn)) => Ok(conn),
        Ok(Err(e)) => {
            error!(database = %database.display(), error = %e, "connection failed");
            Err(DbError::Connection {
                message: e.to_string(),
            })
        }
        Err(_) => {
            error!(database = %database.display(), ?timeout, "connection timed out");
            Err(DbError::Timeout { after: timeout })
        }
    }
}
