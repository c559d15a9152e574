//! Repository traits for data access abstraction.
//!
//! Every entity shares one CRUD contract (`Repository<E>`); the storage
//! backend implements it once, generically. The policy enums decide the
//! behaviours the record-keeper historically left implicit: what a zero-row
//! update means, whether a failed read looks like an empty table, and what
//! happens to rows that reference a deleted one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::{
    DbError, DbResult,
    models::{
        Asset, AssetDraft, Campaign, CampaignDraft, CampaignInsights, Customer, CustomerDraft,
        Lead, LeadDraft, RecordId,
    },
};

/// Column widths shared with the schema's VARCHAR declarations.
pub const MAX_NAME_LEN: usize = 255;
pub const MAX_LABEL_LEN: usize = 50;

/// A persisted entity with a caller-supplied draft form.
pub trait Entity: Sized + Send {
    /// Every field except the store-assigned identifier.
    type Draft: Sync;

    /// Human-readable entity name used in errors and logs.
    const ENTITY_TYPE: &'static str;

    fn id(&self) -> RecordId;

    /// Reject drafts the store would accept but the domain does not.
    fn validate(draft: &Self::Draft) -> DbResult<()>;
}

/// Uniform CRUD contract for one entity type.
pub trait Repository<E: Entity> {
    /// Insert a new row and return it with its assigned identifier.
    async fn create(&self, draft: &E::Draft) -> DbResult<E>;

    /// Get a single row by identifier.
    async fn get(&self, id: RecordId) -> DbResult<E>;

    /// All rows in identifier order.
    async fn read_all(&self) -> DbResult<Vec<E>>;

    /// Overwrite every field of the row with `id`. Returns rows affected.
    async fn update(&self, id: RecordId, draft: &E::Draft) -> DbResult<u64>;

    /// Read the row with `id`, derive a new draft from it with `edit`, and
    /// write that draft back, all in one transaction. Returns the stored row.
    ///
    /// A missing row is `DbError::NotFound` under either affected-rows policy.
    async fn modify<F>(&self, id: RecordId, edit: F) -> DbResult<E>
    where
        F: FnOnce(E) -> E::Draft + Send;

    /// Delete the row with `id`. Returns rows affected.
    async fn delete(&self, id: RecordId) -> DbResult<u64>;

    /// Number of stored rows.
    async fn count(&self) -> DbResult<i64>;
}

/// Aggregate metrics over campaign budgets.
pub trait CampaignInsightsRepository {
    async fn insights(&self) -> DbResult<CampaignInsights>;
}

/// Combined database interface.
///
/// This is the whole surface a front end may use; nothing outside the
/// repositories touches the store.
pub trait Database {
    type Campaigns<'a>: Repository<Campaign> + CampaignInsightsRepository
    where
        Self: 'a;
    type Customers<'a>: Repository<Customer>
    where
        Self: 'a;
    type Leads<'a>: Repository<Lead>
    where
        Self: 'a;
    type Assets<'a>: Repository<Asset>
    where
        Self: 'a;

    /// Create any missing tables. Safe to call on every start.
    async fn ensure_schema(&self) -> DbResult<()>;

    fn campaigns(&self) -> Self::Campaigns<'_>;

    fn customers(&self) -> Self::Customers<'_>;

    fn leads(&self) -> Self::Leads<'_>;

    fn assets(&self) -> Self::Assets<'_>;
}

// =============================================================================
// Policies
// =============================================================================

/// How update/delete treat a statement that matched no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffectedRowsPolicy {
    /// Zero affected rows is still success.
    #[default]
    Lenient,
    /// Zero affected rows is `DbError::NotFound`.
    Strict,
}

/// How `read_all` reports a store failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFailurePolicy {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Log the error and return an empty list.
    EmptyOnError,
}

/// What deleting a row does to rows that reference it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletePolicy {
    /// Issue the delete alone and let the store's foreign-key setting decide.
    #[default]
    StoreDefault,
    /// Refuse with `DbError::Referenced` while dependents exist.
    Restrict,
    /// Null out the referencing column, then delete.
    Detach,
    /// Delete the dependents, then the row.
    Cascade,
}

/// Behavioural switches applied by every repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryOptions {
    pub affected_rows: AffectedRowsPolicy,
    pub read_failures: ReadFailurePolicy,
    pub delete_policy: DeletePolicy,
}

/// Error returned when a policy name does not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPolicy(pub String);

impl fmt::Display for UnknownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown policy '{}'", self.0)
    }
}

impl std::error::Error for UnknownPolicy {}

impl FromStr for AffectedRowsPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" | "false" | "0" => Ok(Self::Lenient),
            "strict" | "true" | "1" => Ok(Self::Strict),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

impl FromStr for ReadFailurePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "propagate" => Ok(Self::Propagate),
            "empty_on_error" | "empty" => Ok(Self::EmptyOnError),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

impl FromStr for DeletePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "store_default" | "default" => Ok(Self::StoreDefault),
            "restrict" => Ok(Self::Restrict),
            "detach" => Ok(Self::Detach),
            "cascade" => Ok(Self::Cascade),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

// =============================================================================
// Entity validation
// =============================================================================

fn require_non_empty(field: &str, value: &str) -> DbResult<()> {
    if value.trim().is_empty() {
        return Err(DbError::Validation {
            message: format!("{} cannot be empty", field),
        });
    }
    Ok(())
}

fn require_max_len(field: &str, value: Option<&str>, max: usize) -> DbResult<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(DbError::Validation {
            message: format!("{} exceeds {} characters", field, max),
        }),
        _ => Ok(()),
    }
}

impl Entity for Campaign {
    type Draft = CampaignDraft;
    const ENTITY_TYPE: &'static str = "campaign";

    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(draft: &CampaignDraft) -> DbResult<()> {
        require_non_empty("campaign name", &draft.name)?;
        require_max_len("campaign name", Some(&draft.name), MAX_NAME_LEN)?;
        if draft.budget.is_some_and(|b| !b.is_finite()) {
            return Err(DbError::Validation {
                message: "budget must be a finite number".to_string(),
            });
        }
        Ok(())
    }
}

impl Entity for Customer {
    type Draft = CustomerDraft;
    const ENTITY_TYPE: &'static str = "customer";

    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(draft: &CustomerDraft) -> DbResult<()> {
        require_non_empty("customer name", &draft.name)?;
        require_non_empty("email", &draft.email)?;
        require_max_len("customer name", Some(&draft.name), MAX_NAME_LEN)?;
        require_max_len("email", Some(&draft.email), MAX_NAME_LEN)?;
        require_max_len(
            "acquisition source",
            draft.acquisition_source.as_deref(),
            MAX_NAME_LEN,
        )
    }
}

impl Entity for Lead {
    type Draft = LeadDraft;
    const ENTITY_TYPE: &'static str = "lead";

    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(draft: &LeadDraft) -> DbResult<()> {
        require_max_len("contact info", draft.contact_info.as_deref(), MAX_NAME_LEN)?;
        require_max_len("lead source", draft.source.as_deref(), MAX_NAME_LEN)?;
        require_max_len("status", draft.status.as_deref(), MAX_LABEL_LEN)
    }
}

impl Entity for Asset {
    type Draft = AssetDraft;
    const ENTITY_TYPE: &'static str = "asset";

    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(draft: &AssetDraft) -> DbResult<()> {
        require_max_len("asset name", draft.name.as_deref(), MAX_NAME_LEN)?;
        require_max_len("file type", draft.file_type.as_deref(), MAX_LABEL_LEN)?;
        require_max_len("file path", draft.file_path.as_deref(), MAX_NAME_LEN)
    }
}
