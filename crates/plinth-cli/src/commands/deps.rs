//! Deps command implementation

use anyhow::{Context, Result};
use plinth_migrate::check_dependencies;

use crate::cli::GlobalArgs;
use crate::commands::common::{load_repo, open_database, ExitCode};

/// Execute the deps command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let repo = load_repo(global)?;
    let db = open_database(&repo)?;

    let report = check_dependencies(&repo.config, &db)
        .await
        .context("Failed to check dependencies")?;

    if report.loaded() {
        println!("All dependencies of {} are active", repo.config.display_title());
        return Ok(());
    }

    for notice in &report.notices {
        println!("{notice}");
    }
    Err(ExitCode(1).into())
}
