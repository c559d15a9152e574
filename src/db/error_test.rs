//! Tests for database error types.

use std::time::Duration;

use super::error::is_lock_contention;
use crate::db::{DbError, DbResult, FailureKind};

#[test]
fn not_found_error_displays_correctly() {
    let err = DbError::NotFound {
        entity_type: "campaign".to_string(),
        id: "42".to_string(),
    };
    assert_eq!(err.to_string(), "Entity not found: campaign with id '42'");
}

#[test]
fn statement_error_names_the_operation() {
    let err = DbError::Statement {
        operation: "create campaign".to_string(),
        message: "disk I/O error".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Statement failed during create campaign: disk I/O error"
    );
}

#[test]
fn referenced_error_counts_dependents() {
    let err = DbError::Referenced {
        entity_type: "campaign".to_string(),
        id: "7".to_string(),
        dependents: 3,
    };
    assert_eq!(
        err.to_string(),
        "campaign '7' is still referenced by 3 row(s)"
    );
}

#[test]
fn connection_failures_are_classified_as_connection() {
    let err = DbError::Connection {
        message: "unable to open database file".to_string(),
    };
    assert_eq!(err.kind(), FailureKind::Connection);

    let err = DbError::Timeout {
        after: Duration::from_secs(5),
    };
    assert_eq!(err.kind(), FailureKind::Connection);
}

#[test]
fn everything_else_is_a_statement_failure() {
    let errors = [
        DbError::Constraint {
            message: "UNIQUE constraint failed: customers.email".to_string(),
        },
        DbError::Validation {
            message: "campaign name cannot be empty".to_string(),
        },
        DbError::NotFound {
            entity_type: "lead".to_string(),
            id: "1".to_string(),
        },
    ];
    for err in errors {
        assert_eq!(err.kind(), FailureKind::Statement, "{}", err);
    }
}

#[test]
fn io_errors_from_the_store_mean_the_connection_broke() {
    let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
    let err = DbError::from_store("read campaigns", sqlx::Error::Io(io));
    assert_eq!(err.kind(), FailureKind::Connection);
}

#[test]
fn other_store_errors_keep_the_operation_name() {
    let err = DbError::from_store("update campaign", sqlx::Error::RowNotFound);
    match err {
        DbError::Statement { operation, .. } => assert_eq!(operation, "update campaign"),
        other => panic!("expected statement error, got {:?}", other),
    }
}

#[test]
fn db_result_err_returns_error() {
    let result: DbResult<i32> = Err(DbError::Validation {
        message: "bad".to_string(),
    });
    assert!(result.is_err());
}

#[test]
fn busy_and_locked_codes_count_as_lock_contention() {
    assert!(is_lock_contention(Some("5")));
    assert!(is_lock_contention(Some("6")));
    // SQLITE_BUSY_SNAPSHOT
    assert!(is_lock_contention(Some("517")));
    assert!(!is_lock_contention(Some("19")));
    assert!(!is_lock_contention(Some("2067")));
    assert!(!is_lock_contention(None));
}

#[test]
fn busy_store_is_a_connection_failure() {
    let err = DbError::Busy {
        operation: "create campaign".to_string(),
        message: "database is locked".to_string(),
    };
    assert_eq!(err.kind(), FailureKind::Connection);
}
