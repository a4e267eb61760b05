//! Unlock command implementation

use anyhow::{Context, Result};
use plinth_migrate::MigrationRunner;

use crate::cli::GlobalArgs;
use crate::commands::common::{load_repo, open_database};

/// Execute the unlock command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let repo = load_repo(global)?;
    let db = open_database(&repo)?;
    let runner = MigrationRunner::new(&db, &db, repo.content_root());

    let cleared = runner
        .unlock(&repo.config.name)
        .await
        .context("Failed to clear migration flag")?;
    if cleared {
        println!("Cleared migration running flag for {}", repo.config.name);
    } else {
        println!("No migration running flag set for {}", repo.config.name);
    }
    Ok(())
}
