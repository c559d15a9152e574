//! Campaign CLI commands
//!
//! This module provides CLI commands for managing marketing campaigns.

use chrono::NaiveDate;
use clap::Args;
use tabled::Tabled;

use crate::cli::commands::{delete_record, overlay, render_fields, render_list};
use crate::cli::error::CliResult;
use crate::cli::utils::{format_amount, format_optional, format_text, truncate_with_ellipsis};
use crate::db::{Campaign, CampaignDraft, Database, RecordId, Repository};

#[derive(Tabled)]
pub(crate) struct CampaignDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: RecordId,
    #[tabled(rename = "Name")]
    pub(crate) name: String,
    #[tabled(rename = "Start")]
    pub(crate) start_date: String,
    #[tabled(rename = "End")]
    pub(crate) end_date: String,
    #[tabled(rename = "Budget")]
    pub(crate) budget: String,
    #[tabled(rename = "Description")]
    pub(crate) description: String,
}

impl From<&Campaign> for CampaignDisplay {
    fn from(campaign: &Campaign) -> Self {
        Self {
            id: campaign.id,
            name: truncate_with_ellipsis(&campaign.name, 40),
            start_date: format_optional(campaign.start_date),
            end_date: format_optional(campaign.end_date),
            budget: format_amount(campaign.budget),
            description: format_text(campaign.description.as_deref(), 40),
        }
    }
}

/// Arguments of `campaign create`
#[derive(Debug, Args)]
pub struct NewCampaign {
    /// Campaign name
    #[arg(long)]
    pub name: String,
    /// First day of the campaign
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start_date: Option<NaiveDate>,
    /// Last day of the campaign
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end_date: Option<NaiveDate>,
    /// Allocated budget
    #[arg(long)]
    pub budget: Option<f64>,
    #[arg(long)]
    pub description: Option<String>,
}

impl From<NewCampaign> for CampaignDraft {
    fn from(args: NewCampaign) -> Self {
        Self {
            name: args.name,
            start_date: args.start_date,
            end_date: args.end_date,
            budget: args.budget,
            description: args.description,
        }
    }
}

/// Arguments of `campaign update`; fields left out keep their stored value
#[derive(Debug, Default, Args)]
pub struct CampaignChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub start_date: Option<NaiveDate>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub end_date: Option<NaiveDate>,
    #[arg(long)]
    pub budget: Option<f64>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "start_date")]
    pub clear_start_date: bool,
    #[arg(long, conflicts_with = "end_date")]
    pub clear_end_date: bool,
    #[arg(long, conflicts_with = "budget")]
    pub clear_budget: bool,
    #[arg(long, conflicts_with = "description")]
    pub clear_description: bool,
}

impl CampaignChanges {
    pub fn apply(self, draft: &mut CampaignDraft) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        overlay(&mut draft.start_date, self.start_date, self.clear_start_date);
        overlay(&mut draft.end_date, self.end_date, self.clear_end_date);
        overlay(&mut draft.budget, self.budget, self.clear_budget);
        overlay(&mut draft.description, self.description, self.clear_description);
    }
}

/// List all campaigns
pub async fn list_campaigns<D: Database>(db: &D, format: &str) -> CliResult<String> {
    let campaigns = db.campaigns().read_all().await?;
    render_list(&campaigns, format, "No campaigns found.", |c| {
        CampaignDisplay::from(c)
    })
}

/// Get a single campaign by ID
pub async fn get_campaign<D: Database>(db: &D, id: RecordId, format: &str) -> CliResult<String> {
    let campaign = db.campaigns().get(id).await?;
    render_fields(
        &campaign,
        format,
        &[
            ("ID", campaign.id.to_string()),
            ("Name", campaign.name.clone()),
            ("Start", format_optional(campaign.start_date)),
            ("End", format_optional(campaign.end_date)),
            ("Budget", format_amount(campaign.budget)),
            ("Description", format_text(campaign.description.as_deref(), 80)),
        ],
    )
}

/// Create a new campaign
pub async fn create_campaign<D: Database>(db: &D, draft: CampaignDraft) -> CliResult<String> {
    let campaign = db.campaigns().create(&draft).await?;
    Ok(format!(
        "✓ Created campaign: {} ({})",
        campaign.name, campaign.id
    ))
}

/// Update a campaign, keeping fields that were not given
pub async fn update_campaign<D: Database>(
    db: &D,
    id: RecordId,
    changes: CampaignChanges,
) -> CliResult<String> {
    let campaign = db
        .campaigns()
        .modify(id, |current| {
            let mut draft = current.draft();
            changes.apply(&mut draft);
            draft
        })
        .await?;
    Ok(format!("✓ Updated campaign: {} ({})", campaign.name, id))
}

/// Delete a campaign (requires --force flag for safety)
pub async fn delete_campaign<D: Database>(db: &D, id: RecordId, force: bool) -> CliResult<String> {
    delete_record::<Campaign, _>(&db.campaigns(), id, force).await
}
