//! Database error types.
//!
//! Every failure that can cross the repository boundary is a `DbError`.
//! It uses miette for diagnostic output and thiserror for derive macros.
//! Each variant belongs to one of two failure kinds: the store could not be
//! reached, or a statement against it failed.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

/// Coarse classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The store was unreachable, refused the connection, or timed out.
    Connection,
    /// A statement (or its commit) was rejected by the store or by input validation.
    Statement,
}

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Connection error: {message}")]
    #[diagnostic(
        code(ledger::db::connection),
        help("Check the database path and that its directory exists and is writable.")
    )]
    Connection { message: String },

    #[error("Connection timed out after {after:?}")]
    #[diagnostic(
        code(ledger::db::timeout),
        help("Raise connect_timeout or check whether another process holds a lock on the store.")
    )]
    Timeout { after: Duration },

    #[error("Store stayed locked during {operation}: {message}")]
    #[diagnostic(
        code(ledger::db::busy),
        help("Another connection held a lock for longer than connect_timeout.")
    )]
    Busy { operation: String, message: String },

    #[error("Statement failed during {operation}: {message}")]
    #[diagnostic(code(ledger::db::statement))]
    Statement { operation: String, message: String },

    #[error("Constraint violation: {message}")]
    #[diagnostic(code(ledger::db::constraint))]
    Constraint { message: String },

    #[error("Validation error: {message}")]
    #[diagnostic(code(ledger::db::validation))]
    Validation { message: String },

    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(ledger::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("{entity_type} '{id}' is still referenced by {dependents} row(s)")]
    #[diagnostic(
        code(ledger::db::referenced),
        help("Delete or detach the dependent rows first, or choose the detach/cascade delete policy.")
    )]
    Referenced {
        entity_type: String,
        id: String,
        dependents: i64,
    },
}

impl DbError {
    /// Which side of the connection/statement split this failure falls on.
    pub fn kind(&self) -> FailureKind {
        match self {
            DbError::Connection { .. } | DbError::Timeout { .. } | DbError::Busy { .. } => {
                FailureKind::Connection
            }
            _ => FailureKind::Statement,
        }
    }

    /// Map a store error raised while executing `operation`.
    ///
    /// Constraint violations get their own variant. I/O failures mean the
    /// connection itself broke, and an exhausted lock wait is a connection
    /// timeout rather than a bad statement.
    pub(crate) fn from_store(operation: &str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if is_lock_contention(db_err.code().as_deref()) => {
                DbError::Busy {
                    operation: operation.to_string(),
                    message: db_err.message().to_string(),
                }
            }
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation()
                    || db_err.is_foreign_key_violation()
                    || db_err.is_check_violation()
                    || matches!(db_err.kind(), sqlx::error::ErrorKind::NotNullViolation) =>
            {
                DbError::Constraint {
                    message: db_err.message().to_string(),
                }
            }
            sqlx::Error::Io(e) => DbError::Connection {
                message: e.to_string(),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::WorkerCrashed => {
                DbError::Connection {
                    message: err.to_string(),
                }
            }
            other => DbError::Statement {
                operation: operation.to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// SQLITE_BUSY (5) or SQLITE_LOCKED (6), including their extended codes.
pub(super) fn is_lock_contention(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .is_some_and(|c| matches!(c & 0xff, 5 | 6))
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
