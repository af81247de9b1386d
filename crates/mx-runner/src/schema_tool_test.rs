use super::*;

fn cli(program: &str) -> MigrateCli {
    MigrateCli::new(program, "/srv/migrations", "duckdb:///srv/app.duckdb")
}

#[test]
fn test_args_apply_all() {
    assert_eq!(
        cli("migrate").args(None),
        vec![
            "-path",
            "/srv/migrations",
            "-database",
            "duckdb:///srv/app.duckdb",
            "up"
        ]
    );
}

#[test]
fn test_args_single_step() {
    let args = cli("migrate").args(Some(1));
    assert_eq!(args.last().map(String::as_str), Some("1"));
    assert_eq!(args[args.len() - 2], "up");
}

#[test]
fn test_from_config_uses_derived_url() {
    let mut config = Config::default();
    config.database.path = "app.duckdb".to_string();
    config.migrations_dir = PathBuf::from("db");

    let tool = MigrateCli::from_config(&config);
    assert_eq!(
        tool.args(None),
        vec![
            "-path",
            "db",
            "-database",
            "duckdb://app.duckdb?x-migrations-table=SchemaMigrations",
            "up"
        ]
    );
}

#[tokio::test]
async fn test_missing_program_fails_to_spawn() {
    let err = cli("/nonexistent/migratex-test-tool")
        .up(None, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::ToolSpawn { .. }));
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn script(dir: &Path, body: &str) -> String {
        let path = dir.join("fake-migrate");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[tokio::test]
    async fn test_success_exit() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "echo applied \"$@\"");
        cli(&program)
            .up(Some(1), &CancellationToken::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_failure_captures_streams() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "echo partial; echo 'no change' >&2; exit 3");
        let err = cli(&program)
            .up(None, &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            RunError::ToolFailed {
                step,
                stdout,
                stderr,
                ..
            } => {
                assert_eq!(step, "all DDL migrations");
                assert_eq!(stdout.trim(), "partial");
                assert_eq!(stderr.trim(), "no change");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_cancellation_stops_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let program = script(dir.path(), "sleep 30");
        let token = CancellationToken::new();
        token.cancel();

        let err = cli(&program).up(Some(1), &token).await.unwrap_err();
        assert!(matches!(err, RunError::Cancelled { .. }));
    }
}
