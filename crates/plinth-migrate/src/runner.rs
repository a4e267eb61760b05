//! Migration runner
//!
//! Applies every not-yet-completed `*.sql` file in a migrations directory,
//! one statement at a time. Statement errors are logged and the run carries
//! on: there is no rollback, and a file counts as completed once all of its
//! statements have been attempted.

use crate::completed::CompletedSet;
use crate::discovery::{discover_migrations, MigrationFile};
use crate::error::MigrateResult;
use crate::guard;
use crate::statements::split_statements;
use plinth_core::{MigrationId, RepoName, SplitMode};
use plinth_db::{Database, OptionStore};
use std::fmt;
use std::path::{Path, PathBuf};

/// What a call to [`MigrationRunner::run`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The migrations directory does not exist; nothing was touched
    NoMigrationsDir,
    /// The running flag was already set for this repo
    AlreadyRunning,
    /// Another caller set the running flag between our check and acquisition
    Contended,
    /// Every discovered file is already completed
    UpToDate,
    /// Pending files were processed
    Applied(MigrationReport),
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::NoMigrationsDir => write!(f, "no migrations directory"),
            RunOutcome::AlreadyRunning => write!(f, "migrations already running"),
            RunOutcome::Contended => write!(f, "another run acquired the migration flag"),
            RunOutcome::UpToDate => write!(f, "up to date"),
            RunOutcome::Applied(report) => write!(
                f,
                "applied {} file(s), {} statement(s), {} failure(s)",
                report.files.len(),
                report.statements_executed(),
                report.failure_count()
            ),
        }
    }
}

/// A statement the database rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFailure {
    pub statement: String,
    pub error: String,
}

/// Per-file result of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub id: MigrationId,

    /// Statements the database accepted
    pub executed: usize,

    /// Statements the database rejected, in execution order
    pub failures: Vec<StatementFailure>,
}

/// Result of processing the pending files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Files that were executed and marked completed
    pub files: Vec<FileReport>,

    /// Files that could not be read; left pending for the next run
    pub unreadable: Vec<(MigrationId, String)>,
}

impl MigrationReport {
    pub fn statements_executed(&self) -> usize {
        self.files.iter().map(|f| f.executed).sum()
    }

    pub fn failure_count(&self) -> usize {
        self.files.iter().map(|f| f.failures.len()).sum::<usize>() + self.unreadable.len()
    }
}

/// Applied/pending state of a repo's migrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Whether the running flag is currently set
    pub running: bool,

    /// Every discovered file with its applied state, in execution order
    pub entries: Vec<(MigrationId, bool)>,
}

impl MigrationStatus {
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|(_, applied)| !applied).count()
    }
}

/// Runs SQL migrations through a [`Database`], tracking state in an [`OptionStore`]
pub struct MigrationRunner<'a> {
    db: &'a dyn Database,
    store: &'a dyn OptionStore,
    content_root: PathBuf,
    split_mode: SplitMode,
}

impl<'a> MigrationRunner<'a> {
    /// Create a runner. Migration identifiers are built relative to `content_root`.
    pub fn new(
        db: &'a dyn Database,
        store: &'a dyn OptionStore,
        content_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            db,
            store,
            content_root: content_root.into(),
            split_mode: SplitMode::default(),
        }
    }

    pub fn with_split_mode(mut self, split_mode: SplitMode) -> Self {
        self.split_mode = split_mode;
        self
    }

    /// Apply pending migrations from `migrations_dir` on behalf of `repo`.
    pub async fn run(&self, repo: &RepoName, migrations_dir: &Path) -> MigrateResult<RunOutcome> {
        if !migrations_dir.is_dir() {
            log::debug!("({repo}) No migrations directory at {}", migrations_dir.display());
            return Ok(RunOutcome::NoMigrationsDir);
        }

        let flag = guard::read_flag(self.store, repo).await?;
        if guard::is_running(flag.as_ref()) {
            log::debug!("({repo}) Migrations already running, skipping");
            return Ok(RunOutcome::AlreadyRunning);
        }

        let mut completed = CompletedSet::load(self.store).await?;
        let pending = self.pending_against(migrations_dir, &completed)?;
        if pending.is_empty() {
            return Ok(RunOutcome::UpToDate);
        }

        if !guard::acquire(self.store, repo, flag.as_ref()).await? {
            log::debug!("({repo}) Migration flag taken by another run, skipping");
            return Ok(RunOutcome::Contended);
        }

        log::info!("({repo}) Running database migrations...");

        let mut report = MigrationReport::default();
        for file in pending {
            let sql = match std::fs::read_to_string(&file.path) {
                Ok(sql) => sql,
                Err(e) => {
                    log::error!("({repo}) Failed to read migration {}: {e}", file.id);
                    report.unreadable.push((file.id, e.to_string()));
                    continue;
                }
            };

            let file_report = self.execute_file(repo, &file.id, &sql).await;
            completed.push(file.id);
            report.files.push(file_report);
        }

        // A failure here leaves the flag set, same as a crash mid-run.
        completed.save(self.store).await?;
        guard::release(self.store, repo).await?;

        log::info!(
            "({repo}) Migrations finished: {} file(s), {} statement(s), {} failure(s)",
            report.files.len(),
            report.statements_executed(),
            report.failure_count()
        );
        Ok(RunOutcome::Applied(report))
    }

    async fn execute_file(&self, repo: &RepoName, id: &MigrationId, sql: &str) -> FileReport {
        let mut file_report = FileReport {
            id: id.clone(),
            executed: 0,
            failures: Vec::new(),
        };

        for statement in split_statements(sql, self.split_mode) {
            log::debug!("({repo}) Executing: {statement}");
            match self.db.execute(&statement).await {
                Ok(_) => file_report.executed += 1,
                Err(e) => {
                    log::error!("({repo}) Error executing migration {id}: {e}");
                    file_report.failures.push(StatementFailure {
                        statement,
                        error: e.to_string(),
                    });
                }
            }
        }
        file_report
    }

    /// Files that a run would execute now, without touching the flag or database.
    pub async fn pending(&self, migrations_dir: &Path) -> MigrateResult<Vec<MigrationFile>> {
        if !migrations_dir.is_dir() {
            return Ok(Vec::new());
        }
        let completed = CompletedSet::load(self.store).await?;
        self.pending_against(migrations_dir, &completed)
    }

    /// Applied state of every discovered file plus the running flag.
    pub async fn status(
        &self,
        repo: &RepoName,
        migrations_dir: &Path,
    ) -> MigrateResult<MigrationStatus> {
        let running = guard::is_running(guard::read_flag(self.store, repo).await?.as_ref());
        if !migrations_dir.is_dir() {
            return Ok(MigrationStatus {
                running,
                entries: Vec::new(),
            });
        }

        let completed = CompletedSet::load(self.store).await?;
        let entries = discover_migrations(migrations_dir, &self.content_root)?
            .into_iter()
            .map(|file| {
                let applied = completed.contains(&file.id);
                (file.id, applied)
            })
            .collect();
        Ok(MigrationStatus { running, entries })
    }

    /// Clear a stuck running flag. Returns whether one was set.
    pub async fn unlock(&self, repo: &RepoName) -> MigrateResult<bool> {
        let cleared = guard::release(self.store, repo).await?;
        if cleared {
            log::warn!("({repo}) Cleared migration running flag");
        }
        Ok(cleared)
    }

    fn pending_against(
        &self,
        migrations_dir: &Path,
        completed: &CompletedSet,
    ) -> MigrateResult<Vec<MigrationFile>> {
        Ok(discover_migrations(migrations_dir, &self.content_root)?
            .into_iter()
            .filter(|file| !completed.contains(&file.id))
            .collect())
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
