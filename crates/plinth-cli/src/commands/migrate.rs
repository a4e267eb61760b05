//! Migrate command implementation

use anyhow::{Context, Result};
use plinth_migrate::{MigrationReport, MigrationRunner, RunOutcome};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{load_repo, open_database, ExitCode};

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let repo = load_repo(global)?;
    let db = open_database(&repo)?;
    let runner = MigrationRunner::new(&db, &db, repo.content_root())
        .with_split_mode(repo.config.statement_splitting);
    let migrations_dir = repo.migrations_dir();

    if args.dry_run {
        let pending = runner
            .pending(&migrations_dir)
            .await
            .context("Failed to compute pending migrations")?;
        if pending.is_empty() {
            println!("No pending migrations for {}", repo.config.name);
        } else {
            println!("Dry run - would apply {} migration(s):", pending.len());
            for file in &pending {
                println!("  {}", file.id);
            }
        }
        return Ok(());
    }

    let outcome = runner
        .run(&repo.config.name, &migrations_dir)
        .await
        .context("Migration run failed")?;
    print_outcome(&repo.config.name, &outcome, global.verbose);

    if matches!(outcome, RunOutcome::AlreadyRunning | RunOutcome::Contended) {
        return Err(ExitCode(2).into());
    }
    Ok(())
}

/// Print a one-line summary of a run, plus per-file detail for applied runs
pub(crate) fn print_outcome(repo: &str, outcome: &RunOutcome, verbose: bool) {
    match outcome {
        RunOutcome::Applied(report) => {
            println!("{repo}: {outcome}");
            print_report(report, verbose);
        }
        RunOutcome::AlreadyRunning => {
            println!("{repo}: {outcome} (use `plinth unlock` if no run is in progress)")
        }
        _ => println!("{repo}: {outcome}"),
    }
}

fn print_report(report: &MigrationReport, verbose: bool) {
    for file in &report.files {
        let marker = if file.failures.is_empty() { "✓" } else { "✗" };
        println!(
            "  {marker} {} ({} statement(s), {} failed)",
            file.id,
            file.executed,
            file.failures.len()
        );
        for failure in &file.failures {
            println!("      {}", failure.error);
            if verbose {
                println!("      statement: {}", failure.statement);
            }
        }
    }
    for (id, error) in &report.unreadable {
        println!("  ✗ {id} (unreadable: {error})");
    }
}
