use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    Cli::command().debug_assert();
}

#[test]
fn test_migrate_accepts_negative_count() {
    let cli = Cli::try_parse_from(["migrato", "migrate", "-2"]).unwrap();
    match cli.command {
        Commands::Migrate(args) => {
            assert_eq!(args.n, -2);
            assert!(!args.plan.dry_run);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_create_joins_words() {
    let cli = Cli::try_parse_from(["migrato", "create", "add", "users"]).unwrap();
    match cli.command {
        Commands::Create(args) => assert_eq!(args.name, vec!["add", "users"]),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_create_requires_name() {
    assert!(Cli::try_parse_from(["migrato", "create"]).is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "migrato",
        "up",
        "--dry-run",
        "--def",
        "cfg/base.yml",
        "--env",
        "cfg/test.yml",
        "--section",
        "analytics",
    ])
    .unwrap();
    assert_eq!(cli.global.def, "cfg/base.yml");
    assert_eq!(cli.global.env_file, "cfg/test.yml");
    assert_eq!(cli.global.section, "analytics");
    assert!(matches!(cli.command, Commands::Up(PlanArgs { dry_run: true })));
}

#[test]
fn test_goto_takes_version() {
    let cli = Cli::try_parse_from(["migrato", "goto", "20230101000000"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Goto(GotoArgs { version: 20230101000000, .. })
    ));
}
