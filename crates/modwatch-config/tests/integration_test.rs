//! Integration tests for modwatch-config crate.

use modwatch_config::{Config, ConfigCache, ConfigError, ConfigLoader, ValidationIssue};
use std::io::Write;

fn valid_config() -> Config {
    let mut config = Config::default();
    config.discord.token = "test_token".to_string();
    config
}

#[test]
fn test_default_config_validation() {
    let mut config = Config::default();

    // Default config should fail validation due to the empty token
    assert!(config.validate().is_err());

    config.discord.token = "test_token".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_cache_replace() {
    let cache = ConfigCache::new(valid_config());
    assert_eq!(cache.get().tracking.tick_interval_seconds, 10);

    let mut faster = valid_config();
    faster.tracking.tick_interval_seconds = 2;
    let previous = cache.replace(faster).unwrap();

    assert_eq!(previous.tracking.tick_interval_seconds, 10);
    assert_eq!(cache.get().tracking.tick_interval_seconds, 2);
}

#[test]
fn test_config_cache_rejects_invalid_replacement() {
    let cache = ConfigCache::new(valid_config());

    let mut broken = valid_config();
    broken.tracking.inactivity_threshold_seconds = 0;

    match cache.replace(broken) {
        Err(ConfigError::Validation(issues)) => {
            assert_eq!(issues, vec![ValidationIssue::ZeroInactivityThreshold]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(cache.get().tracking.inactivity_threshold_seconds, 60);
}

#[test]
fn test_parse_toml_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
[discord]
token = "toml_token"
guild_id = 1
muted_role_id = 2
log_channel_id = 3

[tracking]
tick_interval_seconds = 15
"#
    )
    .unwrap();

    let config = ConfigLoader::parse_file(file.path()).unwrap();
    assert_eq!(config.discord.token, "toml_token");
    assert_eq!(config.discord.muted_role_id.get(), 2);
    assert_eq!(config.tracking.tick_interval_seconds, 15);
    assert_eq!(config.tracking.inactivity_threshold_seconds, 60);
}

#[test]
fn test_parse_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        "{}",
        modwatch_common::test_utils::config_fixtures::full_config_yaml()
    )
    .unwrap();

    let config = ConfigLoader::parse_file(file.path()).unwrap();
    assert_eq!(config.discord.token, "test_token_full");
    assert_eq!(config.tracking.tick_interval_seconds, 5);
}

#[test]
fn test_missing_file_reports_path() {
    let err = ConfigLoader::parse_file(std::path::Path::new("/nonexistent/modwatch.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/nonexistent/modwatch.yaml"));
}
