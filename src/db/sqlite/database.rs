//! The SQLite-backed `Database`.

use sqlx::Connection;
use sqlx::sqlite::SqliteConnection;
use tracing::{Level, debug, error, info, instrument, warn};

use super::connection::{ConnectionProvider, SqliteProvider};
use super::schema::SCHEMA;
use super::table::Table;
use crate::config::{Settings, StoreConfig};
use crate::db::{
    Asset, Campaign, Customer, Database, DbError, DbResult, Lead, RepositoryOptions,
};

/// Repository facade over a connection provider.
///
/// Holds no connection and no cached rows; every operation goes through
/// [`SqliteDatabase::in_transaction`].
pub struct SqliteDatabase<P = SqliteProvider> {
    provider: P,
    options: RepositoryOptions,
}

impl SqliteDatabase<SqliteProvider> {
    /// Database handle for the file described by `config`.
    ///
    /// Nothing is opened until the first operation.
    pub fn open(config: StoreConfig) -> Self {
        Self::with_provider(SqliteProvider::new(config), RepositoryOptions::default())
    }

    pub fn from_settings(settings: Settings) -> Self {
        Self::with_provider(SqliteProvider::new(settings.store), settings.repository)
    }
}

impl<P: ConnectionProvider> SqliteDatabase<P> {
    pub fn with_provider(provider: P, options: RepositoryOptions) -> Self {
        Self { provider, options }
    }

    pub fn options(&self) -> RepositoryOptions {
        self.options
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Acquire a connection, run `work` inside a transaction, then release
    /// the connection.
    ///
    /// The transaction commits only if `work` succeeds; any error rolls it
    /// back. The connection is closed on every path, including when commit
    /// itself fails.
    pub(crate) async fn in_transaction<T, F>(&self, operation: &str, work: F) -> DbResult<T>
    where
        F: AsyncFnOnce(&mut SqliteConnection) -> DbResult<T>,
    {
        let mut conn = self.provider.acquire().await?;
        let outcome = run_in_transaction(&mut conn, operation, work).await;
        if let Err(e) = conn.close().await {
            warn!(operation, error = %e, "failed to close connection cleanly");
        }
        outcome
    }
}

async fn run_in_transaction<T, F>(
    conn: &mut SqliteConnection,
    operation: &str,
    work: F,
) -> DbResult<T>
where
    F: AsyncFnOnce(&mut SqliteConnection) -> DbResult<T>,
{
    let mut tx = conn
        .begin()
        .await
        .map_err(|e| DbError::from_store(operation, e))?;

    match work(&mut *tx).await {
        Ok(value) => {
            tx.commit()
                .await
                .map_err(|e| DbError::from_store(operation, e))?;
            debug!(operation, "committed");
            Ok(value)
        }
        Err(err) => {
            if let Err(e) = tx.rollback().await {
                warn!(operation, error = %e, "rollback failed");
            }
            log_rollback(operation, &err);
            Err(err)
        }
    }
}

fn log_rollback(operation: &str, err: &DbError) {
    let level = rollback_level(err);
    if level == Level::DEBUG {
        debug!(operation, error = %err, "rolled back");
    } else if level == Level::WARN {
        warn!(operation, error = %err, "rolled back");
    } else {
        error!(operation, error = %err, "rolled back");
    }
}

/// Expected outcomes such as a missing row stay out of the error log.
pub(crate) fn rollback_level(err: &DbError) -> Level {
    match err {
        DbError::NotFound { .. } | DbError::Validation { .. } => Level::DEBUG,
        DbError::Referenced { .. } | DbError::Constraint { .. } => Level::WARN,
        _ => Level::ERROR,
    }
}

impl<P: ConnectionProvider> Database for SqliteDatabase<P> {
    type Campaigns<'a>
        = Table<'a, Campaign, P>
    where
        Self: 'a;
    type Customers<'a>
        = Table<'a, Customer, P>
    where
        Self: 'a;
    type Leads<'a>
        = Table<'a, Lead, P>
    where
        Self: 'a;
    type Assets<'a>
        = Table<'a, Asset, P>
    where
        Self: 'a;

    #[instrument(skip(self))]
    async fn ensure_schema(&self) -> DbResult<()> {
        self.in_transaction("ensure schema", async |conn: &mut SqliteConnection| {
            sqlx::raw_sql(SCHEMA)
                .execute(&mut *conn)
                .await
                .map_err(|e| DbError::from_store("ensure schema", e))?;
            Ok(())
        })
        .await?;
        info!("schema ready");
        Ok(())
    }

    fn campaigns(&self) -> Self::Campaigns<'_> {
        Table::new(self)
    }

    fn customers(&self) -> Self::Customers<'_> {
        Table::new(self)
    }

    fn leads(&self) -> Self::Leads<'_> {
        Table::new(self)
    }

    fn assets(&self) -> Self::Assets<'_> {
        Table::new(self)
    }
}
