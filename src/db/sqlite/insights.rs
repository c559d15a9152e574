//! Campaign budget aggregates.

use sqlx::Row;
use sqlx::sqlite::SqliteConnection;
use tracing::instrument;

use super::connection::ConnectionProvider;
use super::table::Table;
use crate::db::{Campaign, CampaignInsights, CampaignInsightsRepository, DbError, DbResult};

// SUM/AVG/MIN/MAX are NULL over zero rows; COUNT is 0.
const INSIGHTS_SQL: &str = r#"
    SELECT
        COUNT(campaign_id) AS total_campaigns,
        SUM(budget) AS total_budget,
        AVG(budget) AS average_budget,
        MIN(budget) AS min_budget,
        MAX(budget) AS max_budget
    FROM campaigns
"#;

impl<P: ConnectionProvider> CampaignInsightsRepository for Table<'_, Campaign, P> {
    #[instrument(skip(self))]
    async fn insights(&self) -> DbResult<CampaignInsights> {
        const OPERATION: &str = "campaign insights";

        self.db
            .in_transaction(OPERATION, async |conn: &mut SqliteConnection| {
                let row = sqlx::query(INSIGHTS_SQL)
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(|e| DbError::from_store(OPERATION, e))?;

                let decode = |e: sqlx::Error| DbError::from_store(OPERATION, e);
                Ok(CampaignInsights {
                    total_campaigns: row.try_get("total_campaigns").map_err(decode)?,
                    total_budget: row.try_get("total_budget").map_err(decode)?,
                    average_budget: row.try_get("average_budget").map_err(decode)?,
                    min_budget: row.try_get("min_budget").map_err(decode)?,
                    max_budget: row.try_get("max_budget").map_err(decode)?,
                })
            })
            .await
    }
}
