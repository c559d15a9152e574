//! Campaign budget insights

use crate::cli::commands::render_fields;
use crate::cli::error::CliResult;
use crate::cli::utils::format_amount;
use crate::db::{CampaignInsightsRepository, Database};

/// Show count, total, average, minimum and maximum of campaign budgets
pub async fn show_insights<D: Database>(db: &D, format: &str) -> CliResult<String> {
    let insights = db.campaigns().insights().await?;
    render_fields(
        &insights,
        format,
        &[
            ("Total Campaigns", insights.total_campaigns.to_string()),
            ("Total Budget", format_amount(insights.total_budget)),
            ("Average Budget", format_amount(insights.average_budget)),
            ("Min Budget", format_amount(insights.min_budget)),
            ("Max Budget", format_amount(insights.max_budget)),
        ],
    )
}
