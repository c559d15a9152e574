//! Tests for campaign budget aggregates.

use super::test_support::{campaign, setup_db};
use crate::db::{CampaignInsightsRepository, Database, Repository};

#[tokio::test(flavor = "multi_thread")]
async fn empty_table_has_count_zero_and_no_aggregates() {
    let db = setup_db().await;
    let insights = db.campaigns().insights().await.expect("Insights should succeed");

    assert_eq!(insights.total_campaigns, 0);
    assert!(insights.is_empty());
    assert_eq!(insights.total_budget, None);
    assert_eq!(insights.average_budget, None);
    assert_eq!(insights.min_budget, None);
    assert_eq!(insights.max_budget, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn aggregates_over_known_budgets() {
    let db = setup_db().await;
    let repo = db.campaigns();
    for (name, budget) in [("low", 100.0), ("mid", 200.0), ("high", 300.0)] {
        repo.create(&campaign(name, Some(budget))).await.unwrap();
    }

    let insights = repo.insights().await.unwrap();

    assert_eq!(insights.total_campaigns, 3);
    assert_eq!(insights.total_budget, Some(600.0));
    assert_eq!(insights.average_budget, Some(200.0));
    assert_eq!(insights.min_budget, Some(100.0));
    assert_eq!(insights.max_budget, Some(300.0));
}

#[tokio::test(flavor = "multi_thread")]
async fn zero_budgets_are_zero_not_absent() {
    let db = setup_db().await;
    let repo = db.campaigns();
    repo.create(&campaign("free", Some(0.0))).await.unwrap();
    repo.create(&campaign("also free", Some(0.0))).await.unwrap();

    let insights = repo.insights().await.unwrap();

    assert_eq!(insights.total_campaigns, 2);
    assert!(!insights.is_empty());
    assert_eq!(insights.total_budget, Some(0.0));
    assert_eq!(insights.average_budget, Some(0.0));
    assert_eq!(insights.min_budget, Some(0.0));
    assert_eq!(insights.max_budget, Some(0.0));
}

#[tokio::test(flavor = "multi_thread")]
async fn campaigns_without_budget_count_but_do_not_aggregate() {
    let db = setup_db().await;
    let repo = db.campaigns();
    repo.create(&campaign("unbudgeted", None)).await.unwrap();
    repo.create(&campaign("budgeted", Some(50.0))).await.unwrap();

    let insights = repo.insights().await.unwrap();

    assert_eq!(insights.total_campaigns, 2);
    assert_eq!(insights.total_budget, Some(50.0));
    assert_eq!(insights.average_budget, Some(50.0));
}

#[tokio::test(flavor = "multi_thread")]
async fn insights_follow_deletes() {
    let db = setup_db().await;
    let repo = db.campaigns();
    let doomed = repo.create(&campaign("doomed", Some(1000.0))).await.unwrap();
    repo.create(&campaign("kept", Some(10.0))).await.unwrap();

    repo.delete(doomed.id).await.unwrap();
    let insights = repo.insights().await.unwrap();

    assert_eq!(insights.total_campaigns, 1);
    assert_eq!(insights.max_budget, Some(10.0));
}
