//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use plinth_core::Config;
use plinth_db::{Database, DuckDbBackend};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; nothing to print.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A repo's configuration together with the directory it lives in
pub(crate) struct LoadedRepo {
    pub(crate) config: Config,
    pub(crate) root: PathBuf,
}

impl LoadedRepo {
    pub(crate) fn migrations_dir(&self) -> PathBuf {
        self.config.migrations_dir_absolute(&self.root)
    }

    pub(crate) fn content_root(&self) -> PathBuf {
        self.config.content_root_absolute(&self.root)
    }
}

/// Load `plinth.yml` from `--config` or the project directory.
///
/// With `--config`, the repo root is the config file's directory.
pub(crate) fn load_repo(global: &GlobalArgs) -> Result<LoadedRepo> {
    match &global.config {
        Some(path) => {
            let path = Path::new(path);
            let config = Config::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            let root = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            Ok(LoadedRepo { config, root })
        }
        None => {
            let root = PathBuf::from(&global.project_dir);
            let config = Config::load_from_dir(&root).context("Failed to load repo")?;
            Ok(LoadedRepo { config, root })
        }
    }
}

/// Open the configured DuckDB database, which also serves as the option store
pub(crate) fn open_database(repo: &LoadedRepo) -> Result<DuckDbBackend> {
    let path = repo.config.database_path_absolute(&repo.root);
    let db = DuckDbBackend::new(&path)
        .with_context(|| format!("Failed to connect to database at {path}"))?;
    log::debug!("Connected to {} database at {path}", db.db_type());
    Ok(db)
}
