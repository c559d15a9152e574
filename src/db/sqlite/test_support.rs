//! Shared fixtures for the SQLite tests.

use std::ops::Deref;
use std::path::PathBuf;

use chrono::NaiveDate;
use sqlx::sqlite::SqliteConnection;
use tempfile::TempDir;

use crate::config::StoreConfig;
use crate::db::{
    CampaignDraft, ConnectionProvider, Database, RepositoryOptions, SqliteDatabase,
    SqliteProvider,
};

/// A database file in a temporary directory, schema applied.
pub(crate) struct TestDb {
    db: SqliteDatabase,
    path: PathBuf,
    _dir: TempDir,
}

impl TestDb {
    pub(crate) fn path(&self) -> &PathBuf {
        &self.path
    }

    /// A connection outside the repository, for arranging fixtures.
    pub(crate) async fn raw(&self) -> SqliteConnection {
        self.db
            .provider()
            .acquire()
            .await
            .expect("Failed to open raw connection")
    }
}

impl Deref for TestDb {
    type Target = SqliteDatabase;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

pub(crate) async fn setup_db() -> TestDb {
    setup_db_with(RepositoryOptions::default()).await
}

pub(crate) async fn setup_db_with(options: RepositoryOptions) -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("ledger.db");
    let db = SqliteDatabase::with_provider(SqliteProvider::new(StoreConfig::at(&path)), options);
    db.ensure_schema().await.expect("Schema should apply");
    TestDb {
        db,
        path,
        _dir: dir,
    }
}

pub(crate) fn spring_sale() -> CampaignDraft {
    CampaignDraft {
        name: "Spring Sale".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 3, 31),
        budget: Some(5000.00),
        description: Some("desc".to_string()),
    }
}

pub(crate) fn campaign(name: &str, budget: Option<f64>) -> CampaignDraft {
    CampaignDraft {
        name: name.to_string(),
        start_date: None,
        end_date: None,
        budget,
        description: None,
    }
}
