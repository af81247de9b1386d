use super::*;
use std::path::PathBuf;

fn global_args() -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        config: None,
        env_id: None,
        database: None,
        migrations_dir: None,
    }
}

#[test]
fn test_flags_override_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migratex.yml");
    std::fs::write(
        &path,
        r#"
env_id: staging
migrations_dir: db/migrations
database:
  path: staging.duckdb
timeout_minutes: 15
"#,
    )
    .unwrap();

    let global = GlobalArgs {
        config: Some(path),
        env_id: Some("dev".to_string()),
        ..global_args()
    };
    let config = load_config(&global).unwrap();

    assert_eq!(config.env_id, "dev");
    assert_eq!(config.database.path, "staging.duckdb");
    assert_eq!(config.migrations_dir, PathBuf::from("db/migrations"));
    assert_eq!(config.timeout_minutes, 15);
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let global = GlobalArgs {
        config: Some(dir.path().join("nope.yml")),
        ..global_args()
    };

    let err = load_config(&global).unwrap_err();
    assert!(format!("{:#}", err).contains("C002"));
}

#[test]
fn test_overrides_fill_defaults() {
    let mut config = Config::default();
    let global = GlobalArgs {
        env_id: Some("prod".to_string()),
        database: Some(":memory:".to_string()),
        migrations_dir: Some(PathBuf::from("sql")),
        ..global_args()
    };

    apply_global_overrides(&mut config, &global);
    let config = finish_config(config).unwrap();

    assert_eq!(config.env_id, "prod");
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.migrations_dir, PathBuf::from("sql"));
}

#[test]
fn test_finish_config_requires_env_id() {
    let mut config = Config::default();
    config.database.path = "app.duckdb".to_string();

    let err = finish_config(config).unwrap_err();
    assert!(format!("{:#}", err).contains("env_id"));
}

#[tokio::test]
async fn test_connector_opens_database_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.duckdb");
    let mut config = Config::default();
    config.database.path = path.display().to_string();

    let connect = connector(&config);
    assert!(!path.exists());

    let db = connect().unwrap();
    assert_eq!(db.db_type(), "duckdb");
    assert!(path.exists());

    // Reconnecting after the previous handle is dropped reopens the file
    drop(db);
    let db = connect().unwrap();
    assert_eq!(db.db_type(), "duckdb");
}
