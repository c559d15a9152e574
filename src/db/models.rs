//! Domain models for the ledger database.
//!
//! These models are storage-agnostic. Each entity comes as a pair: a draft
//! holding every user-supplied field, and the stored record which adds the
//! store-assigned identifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned row identifier.
pub type RecordId = i64;

// =============================================================================
// Campaigns
// =============================================================================

/// Fields of a campaign as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignDraft {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Not checked for sign; callers that care must validate it themselves.
    pub budget: Option<f64>,
    pub description: Option<String>,
}

/// A persisted campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: RecordId,
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub description: Option<String>,
}

impl Campaign {
    /// The caller-supplied fields of this campaign.
    pub fn draft(&self) -> CampaignDraft {
        CampaignDraft {
            name: self.name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            budget: self.budget,
            description: self.description.clone(),
        }
    }
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    /// Unique across all customers.
    pub email: String,
    pub demographics: Option<String>,
    pub acquisition_source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub demographics: Option<String>,
    pub acquisition_source: Option<String>,
}

impl Customer {
    pub fn draft(&self) -> CustomerDraft {
        CustomerDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            demographics: self.demographics.clone(),
            acquisition_source: self.acquisition_source.clone(),
        }
    }
}

// =============================================================================
// Leads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadDraft {
    /// Owning campaign, if any.
    pub campaign_id: Option<RecordId>,
    pub contact_info: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub score: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: RecordId,
    pub campaign_id: Option<RecordId>,
    pub contact_info: Option<String>,
    pub source: Option<String>,
    pub status: Option<String>,
    pub score: Option<i32>,
}

impl Lead {
    pub fn draft(&self) -> LeadDraft {
        LeadDraft {
            campaign_id: self.campaign_id,
            contact_info: self.contact_info.clone(),
            source: self.source.clone(),
            status: self.status.clone(),
            score: self.score,
        }
    }
}

// =============================================================================
// Assets
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub file_type: Option<String>,
    /// Reference to where the file lives; never dereferenced here.
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: RecordId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub file_type: Option<String>,
    pub file_path: Option<String>,
}

impl Asset {
    pub fn draft(&self) -> AssetDraft {
        AssetDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            file_type: self.file_type.clone(),
            file_path: self.file_path.clone(),
        }
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Budget aggregates over every campaign row.
///
/// The budget fields are `None` when there is nothing to aggregate, which is
/// distinct from campaigns that exist with a zero budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignInsights {
    pub total_campaigns: i64,
    pub total_budget: Option<f64>,
    pub average_budget: Option<f64>,
    pub min_budget: Option<f64>,
    pub max_budget: Option<f64>,
}

impl CampaignInsights {
    /// True when no campaign rows exist.
    pub fn is_empty(&self) -> bool {
        self.total_campaigns == 0
    }
}
