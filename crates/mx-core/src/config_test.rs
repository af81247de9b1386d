use super::*;

#[test]
fn test_parse_minimal_config() {
    let yaml = r#"
env_id: dev
database:
  path: ./warehouse.duckdb
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.env_id, "dev");
    assert_eq!(config.migrations_dir, PathBuf::from("."));
    assert_eq!(config.timeout_minutes, 60);
    assert_eq!(config.schema_tool.bin, "migrate");
    assert!(config.validate().is_ok());
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
env_id: prod
migrations_dir: db/migrations
database:
  path: /data/app.duckdb
timeout_minutes: 5
schema_tool:
  bin: /usr/local/bin/migrate
  database_url: duckdb:///data/app.duckdb?x-migrations-table=SchemaMigrations
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.migrations_dir, PathBuf::from("db/migrations"));
    assert_eq!(config.timeout(), Duration::from_secs(300));
    assert_eq!(
        config.schema_tool_database_url(),
        "duckdb:///data/app.duckdb?x-migrations-table=SchemaMigrations"
    );
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("env_id: dev\nspanner_instance: x\n");
    assert!(result.is_err());
}

#[test]
fn test_default_schema_tool_url() {
    let mut config = Config::default();
    config.database.path = "app.duckdb".to_string();
    assert_eq!(
        config.schema_tool_database_url(),
        "duckdb://app.duckdb?x-migrations-table=SchemaMigrations"
    );
}

#[test]
fn test_validate_missing_env_id() {
    let mut config = Config::default();
    config.database.path = "app.duckdb".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("env_id"));
}

#[test]
fn test_validate_missing_database() {
    let config = Config {
        env_id: "dev".to_string(),
        ..Config::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("database.path"));
}

#[test]
fn test_validate_zero_timeout() {
    let mut config = Config {
        env_id: "dev".to_string(),
        timeout_minutes: 0,
        ..Config::default()
    };
    config.database.path = ":memory:".to_string();
    assert!(matches!(
        config.validate().unwrap_err(),
        CoreError::ConfigInvalid { .. }
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(&dir.path().join("migratex.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migratex.yml");
    std::fs::write(&path, "env_id: staging\ndatabase:\n  path: s.duckdb\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.env_id, "staging");
    assert_eq!(config.database.path, "s.duckdb");
}

#[test]
fn test_load_invalid_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migratex.yml");
    std::fs::write(&path, "env_id: [unclosed").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}
