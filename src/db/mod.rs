//! Data-access layer.
//!
//! Repository traits describe what callers may do with the store; the
//! `sqlite` module is the backend that implements them.
//!
//! # Architecture
//!
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (Campaign, Customer, Lead, Asset) and insights
//! - `repository`: Trait definitions and behavioural policies
//! - `sqlite`: SQLite implementation over per-operation connections

mod error;
mod models;
mod repository;
pub mod sqlite;

#[cfg(test)]
mod error_test;

pub use error::{DbError, DbResult, FailureKind};
pub use models::*;
pub use repository::*;
pub use sqlite::{ConnectionProvider, SqliteDatabase, SqliteProvider, Table};
