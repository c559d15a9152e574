use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use super::{Cli, execute};
use crate::cli::error::CliError;
use crate::config::Settings;
use crate::db::sqlite::test_support::setup_db;
use crate::db::{AffectedRowsPolicy, DbError, DeletePolicy};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("Arguments should parse")
}

async fn run_args<D: crate::db::Database>(db: &D, args: &[&str]) -> Result<String, CliError> {
    let cli = parse(args);
    execute(db, cli.command.expect("A command was given")).await
}

// =============================================================================
// Global flags
// =============================================================================

#[test]
fn test_flags_override_settings() {
    let cli = parse(&[
        "ledger",
        "--db",
        "/tmp/elsewhere.db",
        "--affected-rows",
        "strict",
        "--connect-timeout",
        "9",
        "--on-delete",
        "cascade",
        "init",
    ]);

    let mut settings = Settings::default();
    cli.global.apply(&mut settings);

    assert_eq!(settings.store.database, PathBuf::from("/tmp/elsewhere.db"));
    assert_eq!(settings.store.connect_timeout, Duration::from_secs(9));
    assert_eq!(settings.repository.affected_rows, AffectedRowsPolicy::Strict);
    assert_eq!(settings.repository.delete_policy, DeletePolicy::Cascade);
}

#[test]
fn test_absent_flags_leave_settings_alone() {
    let cli = parse(&["ledger", "init"]);

    let mut settings = Settings::default();
    let before = settings.clone();
    cli.global.apply(&mut settings);

    assert_eq!(settings, before);
}

#[test]
fn test_global_flags_accepted_after_subcommand() {
    let cli = parse(&["ledger", "campaign", "list", "--affected-rows", "strict"]);
    assert_eq!(cli.global.affected_rows, Some(AffectedRowsPolicy::Strict));
}

#[test]
fn test_lenient_flag_overrides_strict_environment() {
    let mut settings = Settings::load_from(None, |key| {
        (key == crate::config::ENV_STRICT_AFFECTED_ROWS).then(|| "true".to_string())
    })
    .expect("Settings should load");
    assert_eq!(settings.repository.affected_rows, AffectedRowsPolicy::Strict);

    let cli = parse(&["ledger", "--affected-rows", "lenient", "init"]);
    cli.global.apply(&mut settings);

    assert_eq!(settings.repository.affected_rows, AffectedRowsPolicy::Lenient);
}

#[test]
fn test_unknown_affected_rows_policy_is_rejected() {
    assert!(Cli::try_parse_from(["ledger", "--affected-rows", "sometimes", "init"]).is_err());
}

#[test]
fn test_unknown_delete_policy_is_rejected() {
    assert!(Cli::try_parse_from(["ledger", "--on-delete", "obliterate", "init"]).is_err());
}

#[test]
fn test_malformed_date_is_rejected() {
    let result = Cli::try_parse_from([
        "ledger",
        "campaign",
        "create",
        "--name",
        "Spring",
        "--start-date",
        "03/01/2024",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_clear_flag_conflicts_with_value() {
    let result = Cli::try_parse_from([
        "ledger",
        "campaign",
        "update",
        "1",
        "--budget",
        "10",
        "--clear-budget",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_lead_clear_flags_parse() {
    assert!(
        Cli::try_parse_from(["ledger", "lead", "update", "3", "--clear-campaign", "--status", "lost"])
            .is_ok()
    );
    assert!(
        Cli::try_parse_from(["ledger", "lead", "update", "3", "--clear-campaign", "--campaign", "2"])
            .is_err()
    );
}

#[test]
fn test_no_command_parses() {
    let cli = parse(&["ledger"]);
    assert!(cli.command.is_none());
}

// =============================================================================
// Dispatch
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_init_reports_ready() {
    let db = setup_db().await;
    let output = run_args(&*db, &["ledger", "init"]).await.unwrap();
    assert!(output.contains("Database ready"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_campaign_lifecycle_through_cli() {
    let db = setup_db().await;

    let created = run_args(
        &*db,
        &[
            "ledger",
            "campaign",
            "create",
            "--name",
            "Spring Sale",
            "--start-date",
            "2024-03-01",
            "--budget",
            "5000",
        ],
    )
    .await
    .unwrap();
    assert!(created.contains("✓ Created campaign: Spring Sale"));

    let json = run_args(&*db, &["ledger", "campaign", "list", "--format", "json"])
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    let id = parsed[0]["id"].as_i64().expect("id should be a number");
    assert_eq!(parsed[0]["start_date"], "2024-03-01");
    assert_eq!(parsed[0]["budget"], 5000.0);

    let id_arg = id.to_string();
    run_args(
        &*db,
        &["ledger", "campaign", "update", &id_arg, "--budget", "7500"],
    )
    .await
    .unwrap();

    let insights = run_args(&*db, &["ledger", "insights", "--format", "json"])
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&insights).unwrap();
    assert_eq!(parsed["total_campaigns"], 1);
    assert_eq!(parsed["max_budget"], 7500.0);

    let deleted = run_args(&*db, &["ledger", "campaign", "delete", &id_arg, "--force"])
        .await
        .unwrap();
    assert!(deleted.contains("✓ Deleted campaign"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_campaign_surfaces_database_error() {
    let db = setup_db().await;
    let err = run_args(&*db, &["ledger", "campaign", "get", "42"])
        .await
        .expect_err("Should fail");
    assert!(matches!(
        err,
        CliError::Database(DbError::NotFound { .. })
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_lead_created_for_campaign() {
    let db = setup_db().await;
    run_args(&*db, &["ledger", "campaign", "create", "--name", "Launch"])
        .await
        .unwrap();

    let output = run_args(
        &*db,
        &[
            "ledger", "lead", "create", "--campaign", "1", "--status", "new", "--score", "40",
        ],
    )
    .await
    .unwrap();
    assert!(output.contains("✓ Created lead"));

    let table = run_args(&*db, &["ledger", "lead", "list"]).await.unwrap();
    assert!(table.contains("new"));
    assert!(table.contains("40"));
}
