use configuration::{load_config, Config, ConfigError};
use core_types::RuleId;
use std::io::Write;

#[test]
fn test_defaults_run_all_rules_in_order_and_dry_run() {
    let config = Config::default();
    assert!(config.engine.dry_run);
    assert_eq!(config.engine.rules, RuleId::DEFAULT_ORDER.to_vec());
    assert_eq!(config.engine.transfer_pause_ms, 2_000);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config(dir.path().join("absent.toml")).unwrap();
    assert_eq!(config.api.base_url, "https://api.monzo.com");
    assert_eq!(config.engine.fetch_retry_attempts, 5);
}

#[test]
fn test_file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        r#"
[engine]
dry_run = false
poll_interval_ms = 60000
rules = ["goal", "roundup"]

[logging]
level = "debug"
"#
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert!(!config.engine.dry_run);
    assert_eq!(config.engine.poll_interval_ms, 60_000);
    assert_eq!(config.engine.rules, vec![RuleId::Goal, RuleId::Roundup]);
    assert_eq!(config.logging.level, "debug");
    // Untouched keys keep their defaults.
    assert_eq!(config.engine.transfer_pause_ms, 2_000);
}

#[test]
fn test_duplicate_rules_are_rejected() {
    let mut config = Config::default();
    config.engine.rules = vec![RuleId::Goal, RuleId::Goal];
    assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
}

#[test]
fn test_empty_rules_and_zero_interval_are_rejected() {
    let mut config = Config::default();
    config.engine.rules.clear();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.engine.poll_interval_ms = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_access_token_from_file_wins() {
    let mut config = Config::default();
    config.api.access_token = Some("file-token".to_string());
    assert_eq!(config.api.access_token().unwrap(), "file-token");
}
