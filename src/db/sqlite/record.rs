//! Table descriptions for each entity.
//!
//! A `SqliteRecord` tells the generic table code where an entity lives, which
//! columns hold its draft fields (in bind order), and how to read a row back.
//! All SQL is derived from these descriptions.

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Row, Sqlite};

use crate::db::{
    Asset, AssetDraft, Campaign, CampaignDraft, Customer, CustomerDraft, Entity, Lead, LeadDraft,
};

pub type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// A table holding a nullable reference to another table's identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependent {
    pub table: &'static str,
    pub column: &'static str,
}

pub trait SqliteRecord: Entity {
    const TABLE: &'static str;
    const ID_COLUMN: &'static str;
    /// Draft columns, in the order `bind_draft` binds them.
    const COLUMNS: &'static [&'static str];
    /// Tables that reference this one.
    const DEPENDENTS: &'static [Dependent] = &[];

    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &'q Self::Draft) -> SqliteQuery<'q>;

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error>;
}

impl SqliteRecord for Campaign {
    const TABLE: &'static str = "campaigns";
    const ID_COLUMN: &'static str = "campaign_id";
    const COLUMNS: &'static [&'static str] = &[
        "campaign_name",
        "start_date",
        "end_date",
        "budget",
        "description",
    ];
    const DEPENDENTS: &'static [Dependent] = &[Dependent {
        table: "leads",
        column: "campaign_id",
    }];

    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &'q CampaignDraft) -> SqliteQuery<'q> {
        query
            .bind(&draft.name)
            .bind(draft.start_date)
            .bind(draft.end_date)
            .bind(draft.budget)
            .bind(&draft.description)
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Campaign {
            id: row.try_get("campaign_id")?,
            name: row.try_get("campaign_name")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            budget: row.try_get("budget")?,
            description: row.try_get("description")?,
        })
    }
}

impl SqliteRecord for Customer {
    const TABLE: &'static str = "customers";
    const ID_COLUMN: &'static str = "customer_id";
    const COLUMNS: &'static [&'static str] = &[
        "customer_name",
        "email",
        "demographics",
        "source_of_acquisition",
    ];

    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &'q CustomerDraft) -> SqliteQuery<'q> {
        query
            .bind(&draft.name)
            .bind(&draft.email)
            .bind(&draft.demographics)
            .bind(&draft.acquisition_source)
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Customer {
            id: row.try_get("customer_id")?,
            name: row.try_get("customer_name")?,
            email: row.try_get("email")?,
            demographics: row.try_get("demographics")?,
            acquisition_source: row.try_get("source_of_acquisition")?,
        })
    }
}

impl SqliteRecord for Lead {
    const TABLE: &'static str = "leads";
    const ID_COLUMN: &'static str = "lead_id";
    const COLUMNS: &'static [&'static str] = &[
        "campaign_id",
        "contact_info",
        "lead_source",
        "status",
        "lead_score",
    ];

    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &'q LeadDraft) -> SqliteQuery<'q> {
        query
            .bind(draft.campaign_id)
            .bind(&draft.contact_info)
            .bind(&draft.source)
            .bind(&draft.status)
            .bind(draft.score)
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Lead {
            id: row.try_get("lead_id")?,
            campaign_id: row.try_get("campaign_id")?,
            contact_info: row.try_get("contact_info")?,
            source: row.try_get("lead_source")?,
            status: row.try_get("status")?,
            score: row.try_get("lead_score")?,
        })
    }
}

impl SqliteRecord for Asset {
    const TABLE: &'static str = "assets";
    const ID_COLUMN: &'static str = "asset_id";
    const COLUMNS: &'static [&'static str] =
        &["asset_name", "description", "file_type", "file_path"];

    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &'q AssetDraft) -> SqliteQuery<'q> {
        query
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(&draft.file_type)
            .bind(&draft.file_path)
    }

    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Asset {
            id: row.try_get("asset_id")?,
            name: row.try_get("asset_name")?,
            description: row.try_get("description")?,
            file_type: row.try_get("file_type")?,
            file_path: row.try_get("file_path")?,
        })
    }
}

// =============================================================================
// SQL builders
// =============================================================================

fn column_list<R: SqliteRecord>() -> String {
    R::COLUMNS.join(", ")
}

fn returning_list<R: SqliteRecord>() -> String {
    format!("{}, {}", R::ID_COLUMN, column_list::<R>())
}

pub(crate) fn insert_sql<R: SqliteRecord>() -> String {
    let placeholders = vec!["?"; R::COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        R::TABLE,
        column_list::<R>(),
        placeholders,
        returning_list::<R>()
    )
}

pub(crate) fn select_all_sql<R: SqliteRecord>() -> String {
    format!(
        "SELECT {} FROM {} ORDER BY {}",
        returning_list::<R>(),
        R::TABLE,
        R::ID_COLUMN
    )
}

pub(crate) fn select_one_sql<R: SqliteRecord>() -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ?",
        returning_list::<R>(),
        R::TABLE,
        R::ID_COLUMN
    )
}

pub(crate) fn update_sql<R: SqliteRecord>() -> String {
    let assignments: Vec<String> = R::COLUMNS.iter().map(|c| format!("{} = ?", c)).collect();
    format!(
        "UPDATE {} SET {} WHERE {} = ?",
        R::TABLE,
        assignments.join(", "),
        R::ID_COLUMN
    )
}

pub(crate) fn delete_sql<R: SqliteRecord>() -> String {
    format!("DELETE FROM {} WHERE {} = ?", R::TABLE, R::ID_COLUMN)
}

pub(crate) fn count_sql<R: SqliteRecord>() -> String {
    format!("SELECT COUNT(*) FROM {}", R::TABLE)
}
