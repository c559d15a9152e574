//! Generic CRUD over any `SqliteRecord`.

use std::marker::PhantomData;

use sqlx::sqlite::SqliteConnection;
use tracing::{error, instrument};

use super::connection::{ConnectionProvider, SqliteProvider};
use super::database::SqliteDatabase;
use super::record::{
    Dependent, SqliteRecord, count_sql, delete_sql, insert_sql, select_all_sql, select_one_sql,
    update_sql,
};
use crate::db::{
    AffectedRowsPolicy, DbError, DbResult, DeletePolicy, ReadFailurePolicy, RecordId, Repository,
};

/// Repository for one entity type, borrowed from a [`SqliteDatabase`].
pub struct Table<'a, E, P = SqliteProvider> {
    pub(crate) db: &'a SqliteDatabase<P>,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E: SqliteRecord, P: ConnectionProvider> Table<'a, E, P> {
    pub(crate) fn new(db: &'a SqliteDatabase<P>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    fn operation(verb: &str) -> String {
        format!("{} {}", verb, E::ENTITY_TYPE)
    }

    fn check_affected(&self, affected: u64, id: RecordId) -> DbResult<()> {
        if affected == 0 && self.db.options().affected_rows == AffectedRowsPolicy::Strict {
            return Err(not_found::<E>(id));
        }
        Ok(())
    }
}

async fn fetch_one<E: SqliteRecord>(
    conn: &mut SqliteConnection,
    id: RecordId,
    operation: &str,
) -> DbResult<E> {
    let sql = select_one_sql::<E>();
    let row = sqlx::query(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| DbError::from_store(operation, e))?
        .ok_or_else(|| not_found::<E>(id))?;
    E::from_row(&row).map_err(|e| DbError::from_store(operation, e))
}

fn not_found<E: SqliteRecord>(id: RecordId) -> DbError {
    DbError::NotFound {
        entity_type: E::ENTITY_TYPE.to_string(),
        id: id.to_string(),
    }
}

impl<'a, E: SqliteRecord, P: ConnectionProvider> Repository<E> for Table<'a, E, P> {
    #[instrument(skip_all, fields(entity = E::ENTITY_TYPE))]
    async fn create(&self, draft: &E::Draft) -> DbResult<E> {
        E::validate(draft)?;
        let operation = Self::operation("create");

        self.db
            .in_transaction(&operation, async |conn: &mut SqliteConnection| {
                let sql = insert_sql::<E>();
                let row = E::bind_draft(sqlx::query(&sql), draft)
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(|e| DbError::from_store(&operation, e))?;
                E::from_row(&row).map_err(|e| DbError::from_store(&operation, e))
            })
            .await
    }

    #[instrument(skip(self), fields(entity = E::ENTITY_TYPE))]
    async fn get(&self, id: RecordId) -> DbResult<E> {
        let operation = Self::operation("get");

        self.db
            .in_transaction(&operation, async |conn: &mut SqliteConnection| {
                fetch_one::<E>(conn, id, &operation).await
            })
            .await
    }

    #[instrument(skip(self), fields(entity = E::ENTITY_TYPE))]
    async fn read_all(&self) -> DbResult<Vec<E>> {
        let operation = Self::operation("read all");

        let result = self
            .db
            .in_transaction(&operation, async |conn: &mut SqliteConnection| {
                let sql = select_all_sql::<E>();
                let rows = sqlx::query(&sql)
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(|e| DbError::from_store(&operation, e))?;
                rows.iter()
                    .map(E::from_row)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| DbError::from_store(&operation, e))
            })
            .await;

        match result {
            Err(err) if self.db.options().read_failures == ReadFailurePolicy::EmptyOnError => {
                error!(error = %err, "read failed; reporting an empty result");
                Ok(Vec::new())
            }
            other => other,
        }
    }

    #[instrument(skip(self, draft), fields(entity = E::ENTITY_TYPE))]
    async fn update(&self, id: RecordId, draft: &E::Draft) -> DbResult<u64> {
        E::validate(draft)?;
        let operation = Self::operation("update");

        self.db
            .in_transaction(&operation, async |conn: &mut SqliteConnection| {
                let sql = update_sql::<E>();
                let affected = E::bind_draft(sqlx::query(&sql), draft)
                    .bind(id)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| DbError::from_store(&operation, e))?
                    .rows_affected();
                self.check_affected(affected, id)?;
                Ok(affected)
            })
            .await
    }

    #[instrument(skip(self, edit), fields(entity = E::ENTITY_TYPE))]
    async fn modify<F>(&self, id: RecordId, edit: F) -> DbResult<E>
    where
        F: FnOnce(E) -> E::Draft + Send,
    {
        let operation = Self::operation("update");
        let op = operation.as_str();

        self.db
            .in_transaction(op, async move |conn: &mut SqliteConnection| {
                let current = fetch_one::<E>(&mut *conn, id, op).await?;
                let draft = edit(current);
                E::validate(&draft)?;

                let sql = update_sql::<E>();
                E::bind_draft(sqlx::query(&sql), &draft)
                    .bind(id)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| DbError::from_store(op, e))?;
                fetch_one::<E>(&mut *conn, id, op).await
            })
            .await
    }

    #[instrument(skip(self), fields(entity = E::ENTITY_TYPE))]
    async fn delete(&self, id: RecordId) -> DbResult<u64> {
        let operation = Self::operation("delete");
        let policy = self.db.options().delete_policy;

        self.db
            .in_transaction(&operation, async |conn: &mut SqliteConnection| {
                for dependent in E::DEPENDENTS {
                    resolve_dependents::<E>(&mut *conn, dependent, policy, id, &operation).await?;
                }

                let sql = delete_sql::<E>();
                let affected = sqlx::query(&sql)
                    .bind(id)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| DbError::from_store(&operation, e))?
                    .rows_affected();
                self.check_affected(affected, id)?;
                Ok(affected)
            })
            .await
    }

    #[instrument(skip(self), fields(entity = E::ENTITY_TYPE))]
    async fn count(&self) -> DbResult<i64> {
        let operation = Self::operation("count");

        self.db
            .in_transaction(&operation, async |conn: &mut SqliteConnection| {
                let sql = count_sql::<E>();
                sqlx::query_scalar::<_, i64>(&sql)
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(|e| DbError::from_store(&operation, e))
            })
            .await
    }
}

/// Apply the delete policy to one dependent table before the row goes.
async fn resolve_dependents<E: SqliteRecord>(
    conn: &mut SqliteConnection,
    dependent: &Dependent,
    policy: DeletePolicy,
    id: RecordId,
    operation: &str,
) -> DbResult<()> {
    let sql = match policy {
        DeletePolicy::StoreDefault => return Ok(()),
        DeletePolicy::Restrict => {
            let sql = format!(
                "SELECT COUNT(*) FROM {} WHERE {} = ?",
                dependent.table, dependent.column
            );
            let dependents: i64 = sqlx::query_scalar(&sql)
                .bind(id)
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| DbError::from_store(operation, e))?;
            if dependents > 0 {
                return Err(DbError::Referenced {
                    entity_type: E::ENTITY_TYPE.to_string(),
                    id: id.to_string(),
                    dependents,
                });
            }
            return Ok(());
        }
        DeletePolicy::Detach => format!(
            "UPDATE {} SET {} = NULL WHERE {} = ?",
            dependent.table, dependent.column, dependent.column
        ),
        DeletePolicy::Cascade => format!(
            "DELETE FROM {} WHERE {} = ?",
            dependent.table, dependent.column
        ),
    };

    sqlx::query(&sql)
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| DbError::from_store(operation, e))?;
    Ok(())
}
