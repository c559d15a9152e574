//! Tests for layered configuration.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::*;
use crate::db::{AffectedRowsPolicy, DeletePolicy, ReadFailurePolicy};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_point_at_the_data_dir() {
    let settings = Settings::default();
    assert!(settings.store.database.ends_with("ledger/ledger.db"));
    assert_eq!(settings.store.connect_timeout, Duration::from_secs(5));
    assert!(settings.store.create_if_missing);
    assert!(settings.store.foreign_keys);
}

#[test]
fn empty_yaml_yields_defaults() {
    let settings = Settings::from_yaml_str("").unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn yaml_overrides_only_the_fields_it_names() {
    let settings = Settings::from_yaml_str(
        r#"
store:
  database: /tmp/marketing.db
  connect_timeout: 9
repository:
  affected_rows: strict
  delete_policy: cascade
"#,
    )
    .unwrap();

    assert_eq!(settings.store.database, PathBuf::from("/tmp/marketing.db"));
    assert_eq!(settings.store.connect_timeout, Duration::from_secs(9));
    assert!(settings.store.create_if_missing);
    assert_eq!(settings.repository.affected_rows, AffectedRowsPolicy::Strict);
    assert_eq!(settings.repository.read_failures, ReadFailurePolicy::Propagate);
    assert_eq!(settings.repository.delete_policy, DeletePolicy::Cascade);
}

#[test]
fn unknown_policy_in_yaml_is_an_error() {
    let result = Settings::from_yaml_str("repository:\n  delete_policy: sometimes\n");
    assert!(result.is_err());
}

#[test]
fn env_overrides_store_and_policies() {
    let mut settings = Settings::default();
    settings
        .apply_env_from(lookup(&[
            (ENV_DB_NAME, "/var/lib/ledger/main.db"),
            (ENV_DB_HOST, "db.internal"),
            (ENV_DB_USER, "marketing"),
            (ENV_DB_PASSWORD, "hunter2"),
            (ENV_DB_CONNECT_TIMEOUT, "30"),
            (ENV_STRICT_AFFECTED_ROWS, "true"),
            (ENV_READ_FAILURES, "empty_on_error"),
            (ENV_CAMPAIGN_DELETE, "restrict"),
        ]))
        .unwrap();

    assert_eq!(settings.store.database, PathBuf::from("/var/lib/ledger/main.db"));
    assert_eq!(settings.store.host.as_deref(), Some("db.internal"));
    assert_eq!(settings.store.user.as_deref(), Some("marketing"));
    assert_eq!(settings.store.password.as_deref(), Some("hunter2"));
    assert_eq!(settings.store.connect_timeout, Duration::from_secs(30));
    assert_eq!(settings.repository.affected_rows, AffectedRowsPolicy::Strict);
    assert_eq!(
        settings.repository.read_failures,
        ReadFailurePolicy::EmptyOnError
    );
    assert_eq!(settings.repository.delete_policy, DeletePolicy::Restrict);
}

#[test]
fn bad_timeout_in_env_names_the_variable() {
    let mut settings = Settings::default();
    let err = settings
        .apply_env_from(lookup(&[(ENV_DB_CONNECT_TIMEOUT, "soon")]))
        .unwrap_err();
    assert!(err.to_string().contains(ENV_DB_CONNECT_TIMEOUT));
}

#[test]
fn debug_output_hides_the_password() {
    let mut store = StoreConfig::at("/tmp/x.db");
    store.password = Some("hunter2".to_string());
    let rendered = format!("{:?}", store);
    assert!(!rendered.contains("hunter2"));
    assert!(rendered.contains("***"));
}

#[test]
fn missing_config_file_is_a_read_error() {
    let err = Settings::from_file(std::path::Path::new("/nonexistent/ledger.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn load_reads_file_then_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "store:\n  database: /tmp/from-file.db\n  connect_timeout: 2").unwrap();

    let settings = Settings::load_from(
        Some(file.path()),
        lookup(&[(ENV_DB_CONNECT_TIMEOUT, "11")]),
    )
    .unwrap();

    assert_eq!(settings.store.database, PathBuf::from("/tmp/from-file.db"));
    assert_eq!(settings.store.connect_timeout, Duration::from_secs(11));
}

#[test]
fn config_path_can_come_from_the_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "repository:\n  read_failures: empty_on_error").unwrap();
    let path = file.path().to_string_lossy().to_string();

    let settings = Settings::load_from(None, lookup(&[(ENV_CONFIG, path.as_str())])).unwrap();

    assert_eq!(
        settings.repository.read_failures,
        ReadFailurePolicy::EmptyOnError
    );
}

#[test]
fn explicit_config_path_wins_over_the_environment() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "repository:\n  delete_policy: detach").unwrap();

    let settings = Settings::load_from(
        Some(file.path()),
        lookup(&[(ENV_CONFIG, "/nonexistent/ledger.yaml")]),
    )
    .unwrap();

    assert_eq!(settings.repository.delete_policy, DeletePolicy::Detach);
}

#[test]
fn data_dir_follows_xdg_data_home() {
    let dir = data_dir_from(Some("/srv/data".into()), Some("/home/ada".into()));
    assert_eq!(dir, PathBuf::from("/srv/data/ledger"));
}

#[test]
fn data_dir_falls_back_to_home() {
    let dir = data_dir_from(None, Some("/home/ada".into()));
    assert_eq!(dir, PathBuf::from("/home/ada/.local/share/ledger"));

    let dir = data_dir_from(Some("".into()), Some("/home/ada".into()));
    assert_eq!(dir, PathBuf::from("/home/ada/.local/share/ledger"));
}

#[test]
fn data_dir_without_any_home_is_relative() {
    assert_eq!(data_dir_from(None, None), PathBuf::from("./ledger"));
}
