//! Schema command implementation

use anyhow::{Context, Result};
use plinth_migrate::SchemaManager;

use crate::cli::{GlobalArgs, SchemaArgs, SchemaCommands};
use crate::commands::common::{load_repo, open_database, ExitCode};

/// Execute the schema command
pub async fn execute(args: &SchemaArgs, global: &GlobalArgs) -> Result<()> {
    let repo = load_repo(global)?;
    let db = open_database(&repo)?;
    let manager = SchemaManager::new(&repo.config.schema);

    if repo.config.schema.tables.is_empty() {
        println!("No tables declared for {}", repo.config.name);
        return Ok(());
    }

    match args.command {
        SchemaCommands::Create => {
            let count = manager
                .create_tables(&db)
                .await
                .context("Failed to create tables")?;
            println!("Ensured {count} table(s) exist");
        }
        SchemaCommands::Drop => {
            let count = manager
                .drop_tables(&db)
                .await
                .context("Failed to drop tables")?;
            println!("Dropped {count} table(s)");
        }
        SchemaCommands::Status => {
            let missing = manager
                .missing_tables(&db)
                .await
                .context("Failed to inspect tables")?;
            for table in &repo.config.schema.tables {
                let name = manager.table_name(table);
                let marker = if missing.contains(&name) { "✗" } else { "✓" };
                println!("  {marker} {name}");
            }
            if !missing.is_empty() {
                println!();
                println!("{} table(s) missing; run `plinth schema create`", missing.len());
                return Err(ExitCode(1).into());
            }
        }
    }
    Ok(())
}
