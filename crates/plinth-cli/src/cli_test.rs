use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_parse_global_args_after_subcommand() {
    let cli = Cli::try_parse_from(["plinth", "migrate", "--dry-run", "-p", "repo", "-v"]).unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.project_dir, "repo");
    match cli.command {
        Commands::Migrate(args) => assert!(args.dry_run),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_schema_subcommand() {
    let cli = Cli::try_parse_from(["plinth", "schema", "drop"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Schema(SchemaArgs {
            command: SchemaCommands::Drop
        })
    ));
}

#[test]
fn test_status_output_defaults_to_table() {
    let cli = Cli::try_parse_from(["plinth", "status"]).unwrap();
    match cli.command {
        Commands::Status(args) => assert_eq!(args.output, OutputFormat::Table),
        other => panic!("unexpected command {other:?}"),
    }
}
