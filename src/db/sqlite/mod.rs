//! SQLite implementation of the database traits.
//!
//! This module provides a SQLite-backed implementation of the repository
//! traits defined in the parent module. Connections are opened per
//! operation by a [`ConnectionProvider`].

mod connection;
mod database;
mod insights;
mod record;
mod schema;
mod table;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod insights_test;

pub use connection::{ConnectionProvider, SqliteProvider};
pub use database::SqliteDatabase;
pub use record::{Dependent, SqliteRecord};
pub use table::Table;
