//! Lead CLI commands

use clap::Args;
use tabled::Tabled;

use crate::cli::commands::{delete_record, overlay, render_fields, render_list};
use crate::cli::error::CliResult;
use crate::cli::utils::{format_optional, format_text};
use crate::db::{Database, Lead, LeadDraft, RecordId, Repository};

#[derive(Tabled)]
pub(crate) struct LeadDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: RecordId,
    #[tabled(rename = "Campaign")]
    pub(crate) campaign_id: String,
    #[tabled(rename = "Contact")]
    pub(crate) contact_info: String,
    #[tabled(rename = "Source")]
    pub(crate) source: String,
    #[tabled(rename = "Status")]
    pub(crate) status: String,
    #[tabled(rename = "Score")]
    pub(crate) score: String,
}

impl From<&Lead> for LeadDisplay {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id,
            campaign_id: format_optional(lead.campaign_id),
            contact_info: format_text(lead.contact_info.as_deref(), 30),
            source: format_text(lead.source.as_deref(), 20),
            status: format_text(lead.status.as_deref(), 15),
            score: format_optional(lead.score),
        }
    }
}

/// Fields of a lead
#[derive(Debug, Default, Args)]
pub struct LeadFields {
    /// Campaign the lead came from
    #[arg(long = "campaign")]
    pub campaign_id: Option<RecordId>,
    #[arg(long = "contact")]
    pub contact_info: Option<String>,
    #[arg(long)]
    pub source: Option<String>,
    /// Pipeline status, e.g. new, qualified, converted
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub score: Option<i32>,
}

impl From<LeadFields> for LeadDraft {
    fn from(fields: LeadFields) -> Self {
        Self {
            campaign_id: fields.campaign_id,
            contact_info: fields.contact_info,
            source: fields.source,
            status: fields.status,
            score: fields.score,
        }
    }
}

/// Arguments of `lead update`; fields left out keep their stored value
#[derive(Debug, Default, Args)]
pub struct LeadChanges {
    #[command(flatten)]
    pub fields: LeadFields,
    /// Detach the lead from its campaign
    #[arg(long, conflicts_with = "campaign_id")]
    pub clear_campaign: bool,
    #[arg(long, conflicts_with = "contact_info")]
    pub clear_contact: bool,
    #[arg(long, conflicts_with = "source")]
    pub clear_source: bool,
    #[arg(long, conflicts_with = "status")]
    pub clear_status: bool,
    #[arg(long, conflicts_with = "score")]
    pub clear_score: bool,
}

impl From<LeadFields> for LeadChanges {
    fn from(fields: LeadFields) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }
}

impl LeadChanges {
    pub fn apply(self, draft: &mut LeadDraft) {
        let fields = self.fields;
        overlay(&mut draft.campaign_id, fields.campaign_id, self.clear_campaign);
        overlay(&mut draft.contact_info, fields.contact_info, self.clear_contact);
        overlay(&mut draft.source, fields.source, self.clear_source);
        overlay(&mut draft.status, fields.status, self.clear_status);
        overlay(&mut draft.score, fields.score, self.clear_score);
    }
}

pub async fn list_leads<D: Database>(db: &D, format: &str) -> CliResult<String> {
    let leads = db.leads().read_all().await?;
    render_list(&leads, format, "No leads found.", |l| LeadDisplay::from(l))
}

pub async fn get_lead<D: Database>(db: &D, id: RecordId, format: &str) -> CliResult<String> {
    let lead = db.leads().get(id).await?;
    render_fields(
        &lead,
        format,
        &[
            ("ID", lead.id.to_string()),
            ("Campaign", format_optional(lead.campaign_id)),
            ("Contact", format_text(lead.contact_info.as_deref(), 80)),
            ("Source", format_text(lead.source.as_deref(), 80)),
            ("Status", format_text(lead.status.as_deref(), 80)),
            ("Score", format_optional(lead.score)),
        ],
    )
}

pub async fn create_lead<D: Database>(db: &D, draft: LeadDraft) -> CliResult<String> {
    let lead = db.leads().create(&draft).await?;
    Ok(format!("✓ Created lead: {}", lead.id))
}

pub async fn update_lead<D: Database>(
    db: &D,
    id: RecordId,
    changes: LeadChanges,
) -> CliResult<String> {
    db.leads()
        .modify(id, |current| {
            let mut draft = current.draft();
            changes.apply(&mut draft);
            draft
        })
        .await?;
    Ok(format!("✓ Updated lead: {}", id))
}

pub async fn delete_lead<D: Database>(db: &D, id: RecordId, force: bool) -> CliResult<String> {
    delete_record::<Lead, _>(&db.leads(), id, force).await
}
