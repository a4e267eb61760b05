//! Repo bootstrap
//!
//! A repo is a pluggable unit (plugin or theme) with its own `plinth.yml`.
//! Booting one checks its dependencies and, in interactive contexts, applies
//! its pending migrations.

use crate::error::MigrateResult;
use crate::runner::{MigrationRunner, RunOutcome};
use plinth_core::dependencies::{self, ACTIVE_PLUGINS_OPTION, ACTIVE_THEME_OPTION};
use plinth_core::{Config, DependencyReport, ExecutionContext, InstalledComponents, RepoName};
use plinth_db::{Database, OptionStore};
use std::path::{Path, PathBuf};

/// A booted repo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repo {
    pub name: RepoName,
    pub title: String,

    /// Directory holding the repo's `plinth.yml`
    pub dir: PathBuf,

    /// Whether every dependency was met
    pub loaded: bool,

    pub dependency_report: DependencyReport,

    /// Migration outcome; `None` when migrations were not attempted
    pub migrations: Option<RunOutcome>,
}

impl Repo {
    /// Check dependencies, then run migrations if `ctx` allows them.
    pub async fn boot(
        config: &Config,
        dir: &Path,
        ctx: ExecutionContext,
        db: &dyn Database,
        store: &dyn OptionStore,
    ) -> MigrateResult<Self> {
        let dependency_report = check_dependencies(config, store).await?;
        let mut repo = Self {
            name: config.name.clone(),
            title: config.display_title().to_string(),
            dir: dir.to_path_buf(),
            loaded: false,
            dependency_report,
            migrations: None,
        };

        if !repo.dependency_report.loaded() {
            for notice in &repo.dependency_report.notices {
                log::warn!("({}) {notice}", repo.name);
            }
            return Ok(repo);
        }

        if ctx.allows_migrations() {
            let runner = MigrationRunner::new(db, store, config.content_root_absolute(dir))
                .with_split_mode(config.statement_splitting);
            let outcome = runner
                .run(&repo.name, &config.migrations_dir_absolute(dir))
                .await?;
            repo.migrations = Some(outcome);
        } else {
            log::debug!("({}) Skipping migrations outside interactive context", repo.name);
        }

        repo.loaded = true;
        Ok(repo)
    }
}

/// Check a repo's dependencies against the installed state in `store`.
pub async fn check_dependencies(
    config: &Config,
    store: &dyn OptionStore,
) -> MigrateResult<DependencyReport> {
    if config.dependencies.is_empty() {
        return Ok(DependencyReport::default());
    }

    let installed = InstalledComponents::from_options(
        store.get_option(ACTIVE_PLUGINS_OPTION).await?,
        store.get_option(ACTIVE_THEME_OPTION).await?,
    )?;
    Ok(dependencies::check(
        &config.name,
        &config.dependencies,
        &installed,
    ))
}

#[cfg(test)]
#[path = "repo_test.rs"]
mod tests;
