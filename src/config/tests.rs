use super::*;
use crate::options::InjectionMode;

#[test]
fn test_toml_settings_keep_pattern_order() {
    let toml = r#"
        [logging]
        log_level = "debug"

        [aggregate."tasks.*.assigneeId"]
        source = "user"
        remove_id_key = true
        to = { key = "assignee", omit_null = true }

        [aggregate.taskId]
        source = "todo"
    "#;

    let settings = Settings::from_toml_str(toml).unwrap();
    assert_eq!(settings.logging.log_level, "debug");
    assert!(!settings.logging.log_to_file);

    let config = settings.aggregation_config().unwrap();
    let patterns: Vec<&str> = config.iter().map(|(p, _)| p).collect();
    assert_eq!(patterns, vec!["tasks.*.assigneeId", "taskId"]);

    let assignee = config.get("tasks.*.assigneeId").unwrap();
    assert!(assignee.remove_id_key);
    assert_eq!(
        assignee.mode(),
        InjectionMode::ToKey {
            key: "assignee".to_string(),
            omit_null: true
        }
    );
    assert_eq!(config.get("taskId").unwrap().mode(), InjectionMode::Merge);
}

#[test]
fn test_empty_settings_use_defaults() {
    let settings = Settings::from_toml_str("").unwrap();

    assert_eq!(settings.logging, LoggingConfig::default());
    assert_eq!(settings.logging.log_level, "info");
    assert!(settings.aggregation_config().unwrap().is_empty());
}

#[test]
fn test_json_settings_with_inline_transform() {
    let json = r#"{
        "aggregate": {
            "assigneeId": {
                "source": "user",
                "to": { "key": "assignee" },
                "transform": {
                    "spec": [{ "operation": "shift", "spec": { "name": "display_name" } }]
                }
            }
        }
    }"#;

    let settings = Settings::from_json_str(json).unwrap();
    let config = settings.aggregation_config().unwrap();
    let option = config.get("assigneeId").unwrap();

    let transform = option.transform.as_ref().unwrap();
    assert_eq!(
        transform.apply(serde_json::json!({"name": "Andy", "id": "A"})).unwrap(),
        serde_json::json!({"display_name": "Andy"})
    );
    assert_eq!(option.to.as_ref().map(|to| to.omit_null), Some(false));
}

#[test]
fn test_invalid_pattern_is_reported() {
    let toml = r#"
        [aggregate."tasks..assigneeId"]
        source = "user"
    "#;

    let err = Settings::from_toml_str(toml)
        .unwrap()
        .aggregation_config()
        .unwrap_err();

    match err {
        ConfigError::InvalidPattern { pattern, reason } => {
            assert_eq!(pattern, "tasks..assigneeId");
            assert_eq!(reason, "pattern has an empty segment");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_source_fails_to_parse() {
    let toml = r#"
        [aggregate.assigneeId]
        remove_id_key = true
    "#;

    assert!(matches!(
        Settings::from_toml_str(toml),
        Err(ConfigError::Toml(_))
    ));
}

#[test]
fn test_transform_without_spec_is_rejected() {
    let toml = r#"
        [aggregate.assigneeId]
        source = "user"
        transform = {}
    "#;

    let err = Settings::from_toml_str(toml)
        .unwrap()
        .aggregation_config()
        .unwrap_err();

    assert!(matches!(err, ConfigError::Transform { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Settings::from_file("/nonexistent/aggregate.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
