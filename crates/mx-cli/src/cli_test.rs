use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_parse_up_with_overrides() {
    let cli = Cli::try_parse_from([
        "migratex",
        "--env-id",
        "dev",
        "--database",
        "app.duckdb",
        "up",
        "--timeout-minutes",
        "5",
        "--schema-tool",
        "/usr/local/bin/migrate",
    ])
    .unwrap();

    assert_eq!(cli.global.env_id.as_deref(), Some("dev"));
    assert_eq!(cli.global.database.as_deref(), Some("app.duckdb"));
    match cli.command {
        Commands::Up(args) => {
            assert_eq!(args.timeout_minutes, Some(5));
            assert_eq!(args.schema_tool.as_deref(), Some("/usr/local/bin/migrate"));
            assert!(args.schema_tool_database_url.is_none());
        }
        other => panic!("expected up, got {:?}", other),
    }
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["migratex", "status", "-v", "-d", "db/migrations"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.migrations_dir, Some(PathBuf::from("db/migrations")));
    assert!(matches!(cli.command, Commands::Status(StatusArgs { all: false })));
}

#[test]
fn test_subcommand_required() {
    assert!(Cli::try_parse_from(["migratex"]).is_err());
}
