//! Status command implementation

use anyhow::{Context, Result};
use plinth_migrate::MigrationRunner;
use serde_json::json;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{load_repo, open_database};

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let repo = load_repo(global)?;
    let db = open_database(&repo)?;
    let runner = MigrationRunner::new(&db, &db, repo.content_root());

    let status = runner
        .status(&repo.config.name, &repo.migrations_dir())
        .await
        .context("Failed to read migration status")?;

    match args.output {
        OutputFormat::Json => {
            let entries: Vec<_> = status
                .entries
                .iter()
                .map(|(id, applied)| json!({ "id": id.as_str(), "applied": applied }))
                .collect();
            let out = json!({
                "repo": repo.config.name.as_str(),
                "running": status.running,
                "pending": status.pending_count(),
                "migrations": entries,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            println!("Migrations for {}:", repo.config.display_title());
            if status.entries.is_empty() {
                println!("  (none found in {})", repo.migrations_dir().display());
            }
            for (id, applied) in &status.entries {
                let marker = if *applied { "applied" } else { "pending" };
                println!("  [{marker}] {id}");
            }
            println!();
            println!(
                "{} applied, {} pending",
                status.entries.len() - status.pending_count(),
                status.pending_count()
            );
            if status.running {
                println!("Migration running flag is SET (use `plinth unlock` to clear a stuck run)");
            }
        }
    }
    Ok(())
}
