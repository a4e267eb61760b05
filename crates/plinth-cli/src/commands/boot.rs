//! Boot command implementation
//!
//! Runs the same sequence a host performs when it initializes the repo:
//! dependency check, then migrations unless a background mode is set in the
//! environment.

use anyhow::{Context, Result};
use plinth_core::ExecutionContext;
use plinth_migrate::Repo;

use crate::cli::GlobalArgs;
use crate::commands::common::{load_repo, open_database, ExitCode};
use crate::commands::migrate::print_outcome;

/// Execute the boot command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let loaded = load_repo(global)?;
    let db = open_database(&loaded)?;
    let ctx = ExecutionContext::from_env();
    log::debug!("Execution context: {ctx:?}");

    let repo = Repo::boot(&loaded.config, &loaded.root, ctx, &db, &db)
        .await
        .context("Failed to boot repo")?;

    if !repo.loaded {
        println!("{} is not loaded:", repo.title);
        for notice in &repo.dependency_report.notices {
            println!("  {notice}");
        }
        return Err(ExitCode(1).into());
    }

    println!("{} loaded", repo.title);
    match &repo.migrations {
        Some(outcome) => print_outcome(repo.name.as_str(), outcome, global.verbose),
        None => println!("{}: migrations skipped (background execution mode)", repo.name),
    }
    Ok(())
}
