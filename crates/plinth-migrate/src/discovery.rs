//! Migration file discovery

use crate::error::{MigrateError, MigrateResult};
use glob::{MatchOptions, Pattern};
use plinth_core::MigrationId;
use std::path::{Path, PathBuf};

/// A `*.sql` file found in a migrations directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Storage-relative identifier recorded in the completed set
    pub id: MigrationId,

    /// Absolute path used to read the file
    pub path: PathBuf,
}

/// List the `*.sql` files directly inside `dir`, ordered by identifier.
///
/// Identifiers are built relative to `content_root`. Both paths are
/// canonicalized when possible so `..` segments in configuration do not leak
/// into identifiers. Hidden files are skipped.
pub fn discover_migrations(dir: &Path, content_root: &Path) -> MigrateResult<Vec<MigrationFile>> {
    let dir = canonical_or_given(dir);
    let content_root = canonical_or_given(content_root);

    let pattern = format!("{}/*.sql", Pattern::escape(&dir.to_string_lossy()));
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = glob::glob_with(&pattern, options).map_err(|e| MigrateError::Discovery {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| MigrateError::Discovery {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        if !path.is_file() {
            continue;
        }
        files.push(MigrationFile {
            id: MigrationId::from_path(&path, &content_root),
            path,
        });
    }

    files.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(files)
}

fn canonical_or_given(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
